use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How far a cursor scans locally before falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the keyframe interval used by the previous sample.
///
/// Scroll scrubbing mostly moves a few frames at a time in either direction,
/// so the next lookup usually lands within a few slots of the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// One value per keyframe, or three (in-tangent, value, out-tangent) for cubic splines.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Time of the last keyframe, or zero for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    /// Checks that the value count matches the keyframe count for the
    /// interpolation mode and that times never decrease.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let expected = match self.interpolation {
            InterpolationMode::CubicSpline => self.times.len() * 3,
            InterpolationMode::Linear | InterpolationMode::Step => self.times.len(),
        };
        self.values.len() == expected && self.times.windows(2).all(|w| w[0] <= w[1])
    }

    /// Stateless sample. Returns `None` for a track without keyframes.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let next = self.times.partition_point(|&t| t <= time);
        Some(self.sample_at_frame(next.saturating_sub(1), time))
    }

    /// Sample that reuses and updates `cursor`.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.times.len() == 1 {
            return Some(*self.value_at(0));
        }

        let index = self
            .scan_from(cursor.last_index, time)
            .unwrap_or_else(|| self.times.partition_point(|&t| t <= time).saturating_sub(1));
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    /// Looks for the interval containing `time` near `start`.
    fn scan_from(&self, start: usize, time: f32) -> Option<usize> {
        let len = self.times.len();
        let start = start.min(len - 1);

        if time >= self.times[start] {
            for idx in start..=(start + MAX_SCAN_OFFSET) {
                if idx >= len - 1 {
                    return Some(len - 1);
                }
                if time < self.times[idx + 1] {
                    return Some(idx);
                }
            }
            None
        } else {
            (start.saturating_sub(MAX_SCAN_OFFSET)..start)
                .rev()
                .find(|&idx| time >= self.times[idx])
        }
    }

    fn value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            InterpolationMode::Linear | InterpolationMode::Step => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index >= len - 1 {
            return *self.value_at(len - 1);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let dt = self.times[next] - t0;
        let t = if dt > 1e-6 {
            ((time - t0) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self.interpolation {
            InterpolationMode::Step => *self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(*self.value_at(index), *self.value_at(next), t)
            }
            InterpolationMode::CubicSpline => T::interpolate_cubic(
                self.values[index * 3 + 1],
                self.values[index * 3 + 2],
                self.values[next * 3],
                self.values[next * 3 + 1],
                t,
                dt,
            ),
        }
    }
}
