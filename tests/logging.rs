#[test]
fn second_init_reports_an_error() {
    let _ = joltsim::logging::try_init();
    assert!(joltsim::logging::try_init().is_err());
    log::info!("logger installed");
}
