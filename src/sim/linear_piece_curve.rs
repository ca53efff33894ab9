/// A continuous piecewise-linear function defined by `(x, y)` knots sorted by `x`.
///
/// Below the first knot the output holds at the first `y`; above the last knot it holds
/// at the last `y`.
#[derive(Clone, Copy, Debug)]
pub struct LinearPieceCurve<const N: usize> {
    knots: [(f32, f32); N],
}

impl<const N: usize> LinearPieceCurve<N> {
    #[must_use]
    pub const fn new(knots: [(f32, f32); N]) -> Self {
        assert!(N != 0, "a curve needs at least one knot");
        Self { knots }
    }

    /// Smallest and largest `x` covered by the knots.
    #[must_use]
    pub const fn domain(&self) -> (f32, f32) {
        (self.knots[0].0, self.knots[N - 1].0)
    }

    #[must_use]
    pub fn get_output(&self, input: f32) -> f32 {
        let (first_x, first_y) = self.knots[0];
        if input <= first_x {
            return first_y;
        }

        let Some(upper) = self.knots.iter().position(|&(x, _)| x > input) else {
            return self.knots[N - 1].1;
        };

        let (x0, y0) = self.knots[upper - 1];
        let (x1, y1) = self.knots[upper];
        let frac = (input - x0) / (x1 - x0);
        y0 + (y1 - y0) * frac
    }
}
