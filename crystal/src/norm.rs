pub trait Normed: Copy {
    fn norm_squared(&self) -> f64;
    fn scale_mut(&mut self, n: f64);
    fn unscale_mut(&mut self, n: f64);

    fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Returns a copy with a norm of one.
    ///
    /// A zero-length value yields NaN components; nothing is checked here.
    fn normalized(&self) -> Self {
        let mut value = *self;
        value.unscale_mut(self.norm());
        value
    }

    fn is_normalized(&self, error_margin: f64) -> bool {
        (self.norm_squared() - 1.0).abs() <= error_margin
    }
}
