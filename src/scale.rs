/// Categorical scale: splits a pixel range into one uniform slot per category.
///
/// `padding` is applied both between bands and at the two outer edges, so the
/// bands stay centered in the range.
#[derive(Debug, Clone)]
pub struct BandScale {
    categories: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(categories: Vec<String>, range_width: f64, padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = categories.len() as f64;
        let step = range_width / (n - padding + 2.0 * padding).max(1.0);
        let start = (range_width - step * (n - padding)) / 2.0;
        BandScale {
            categories,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the category's band, relative to the range origin.
    pub fn position(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| self.start + i as f64 * self.step)
    }

    /// Center of the category's band.
    pub fn center(&self, category: &str) -> Option<f64> {
        self.position(category).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// Linear value scale from `[0, upper]` onto `[height, 0]` (y grows downward).
#[derive(Debug, Clone)]
pub struct LinearScale {
    upper: f64,
    height: f64,
}

impl LinearScale {
    pub fn new(upper: f64, height: f64) -> Self {
        LinearScale { upper, height }
    }

    /// Domain upper bound is `headroom × max(values)`. Falls back to 1.0 when
    /// every value is zero or the set is empty.
    pub fn for_values(values: impl IntoIterator<Item = f64>, headroom: f64, height: f64) -> Self {
        let max = values.into_iter().fold(0.0_f64, f64::max);
        let upper = max * headroom;
        let upper = if upper > 0.0 && upper.is_finite() { upper } else { 1.0 };
        LinearScale::new(upper, height)
    }

    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.upper)
    }

    /// Values outside the domain are clamped, so nothing maps below the baseline.
    pub fn map(&self, value: f64) -> f64 {
        let t = (value / self.upper).clamp(0.0, 1.0);
        self.height - t * self.height
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(0.0, self.upper, count)
    }
}

/// Evenly spaced tick values within `[start, stop]`, stepping by 1, 2 or 5
/// times a power of ten, with roughly `count` ticks.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !(stop > start) {
        return vec![start];
    }

    let step0 = (stop - start) / count as f64;
    let power = step0.log10().floor();
    let error = step0 / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Negative powers divide by the inverse step to avoid 0.30000000000000004
    if power < 0.0 {
        let inverse = 10f64.powf(-power) / factor;
        let first = (start * inverse).ceil() as i64;
        let last = (stop * inverse).floor() as i64;
        (first..=last).map(|i| i as f64 / inverse).collect()
    } else {
        let step = factor * 10f64.powf(power);
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}
