use std::collections::BTreeMap;

/// Login → bearer token, filled by the registration and login phases.
pub type TokenMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    /// Seconds between the phase origin and the moment the request was sent.
    pub start: f64,
    /// Client-observed round trip in milliseconds.
    pub latency: f64,
}

/// Samples of one phase, in the order the workers completed them.
#[derive(Debug, Clone, Default)]
pub struct LatencyTable {
    pub route: String,
    samples: Vec<LatencySample>,
}

impl LatencyTable {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            samples: Vec::new(),
        }
    }

    pub fn with_capacity(route: impl Into<String>, capacity: usize) -> Self {
        Self {
            route: route.into(),
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: LatencySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.latency)
    }

    pub fn summary(&self) -> Option<Summary> {
        Summary::from_latencies(&self.latencies().collect::<Vec<_>>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single sample.
    pub std: f64,
    pub median: f64,
}

impl Summary {
    pub fn from_latencies(data: &[f64]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            let sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (sq / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            mean,
            max: sorted[count - 1],
            min: sorted[0],
            std,
            median: median_of_sorted(&sorted),
        })
    }
}

/// Caller guarantees `sorted` is non-empty and ascending.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
