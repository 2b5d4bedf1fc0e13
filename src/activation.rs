use num::Float;

/// Logistic function, `1 / (1 + e^-x)`.
pub fn sigmoid<T: Float>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

/// Derivative of the sigmoid, taken on a value that already went through [`sigmoid`].
pub fn sigmoid_derivative<T: Float>(activated: T) -> T {
    activated * (T::one() - activated)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        assert_eq!(sigmoid(0.0f64), 0.5);
        assert_relative_eq!(sigmoid(2.0f64) + sigmoid(-2.0f64), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let x = 0.3f64;
        let h = 1e-6;
        let numerical = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);

        assert_relative_eq!(sigmoid_derivative(sigmoid(x)), numerical, max_relative = 1e-6);
        assert_eq!(sigmoid_derivative(0.5f32), 0.25);
    }
}
