/// Accumulates instantaneous frame-rate samples for one sampling interval.
///
/// Samples are ephemeral: pushed every rendered frame, collapsed into a mean
/// when the interval elapses, then discarded.
#[derive(Debug, Default, Clone)]
pub struct FrameSampler {
    sum: f32,
    count: u32,
}

impl FrameSampler {
    pub fn push(&mut self, fps: f32) {
        self.sum += fps;
        self.count += 1;
    }

    /// Mean of the accumulated samples, or `None` for an empty window.
    pub fn mean(&self) -> Option<f32> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f32)
        }
    }

    pub fn clear(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_no_mean() {
        let sampler = FrameSampler::default();
        assert_eq!(sampler.mean(), None);
    }

    #[test]
    fn mean_over_samples() {
        let mut sampler = FrameSampler::default();
        sampler.push(30.0);
        sampler.push(60.0);
        assert_eq!(sampler.mean(), Some(45.0));
        sampler.clear();
        assert!(sampler.is_empty());
    }
}
