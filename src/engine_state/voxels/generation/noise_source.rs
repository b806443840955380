//! Coherent-noise primitives used by every procedural decision.

use noise::{core::worley::ReturnType, Fbm, MultiFractal, NoiseFn, OpenSimplex, Perlin, Worley};

use crate::config::NoiseSettings;

/// The noise primitives the classifier and decorators are built from.
///
/// Callers pass raw world-space coordinates pre-multiplied by their own layer
/// scale; implementations apply the world-wide frequency. Every method must be
/// a pure function of its inputs and the implementation's seed.
pub trait NoiseField {
    /// 2-D simplex noise in roughly `[-1, 1]`.
    fn simplex_2d(&self, x: f64, z: f64) -> f64;
    /// 3-D simplex noise in roughly `[-1, 1]`.
    fn simplex_3d(&self, x: f64, y: f64, z: f64) -> f64;
    /// 3-D fractal Perlin noise.
    fn perlin_fractal_3d(&self, x: f64, y: f64, z: f64) -> f64;
    /// 3-D fractal simplex noise.
    fn simplex_fractal_3d(&self, x: f64, y: f64, z: f64) -> f64;
    /// 3-D cellular noise returning the value of the nearest feature cell.
    fn cellular_3d(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Seeded noise primitives backed by the `noise` crate.
///
/// All primitives share one seed. The source is cheap enough to construct
/// that each generation task builds its own on the worker thread.
#[derive(Clone)]
pub struct NoiseSource {
    frequency: f64,
    simplex: OpenSimplex,
    perlin_fractal: Fbm<Perlin>,
    simplex_fractal: Fbm<OpenSimplex>,
    cellular: Worley,
}

impl NoiseSource {
    /// Builds every primitive from `seed` and `settings`.
    pub fn new(seed: u32, settings: &NoiseSettings) -> Self {
        let perlin_fractal = Fbm::<Perlin>::new(seed)
            .set_frequency(1.0)
            .set_octaves(settings.octaves)
            .set_lacunarity(settings.lacunarity)
            .set_persistence(settings.gain);

        let simplex_fractal = Fbm::<OpenSimplex>::new(seed)
            .set_frequency(1.0)
            .set_octaves(settings.octaves)
            .set_lacunarity(settings.lacunarity)
            .set_persistence(settings.gain);

        let cellular = Worley::new(seed)
            .set_frequency(1.0)
            .set_return_type(ReturnType::Value);

        NoiseSource {
            frequency: settings.frequency,
            simplex: OpenSimplex::new(seed),
            perlin_fractal,
            simplex_fractal,
            cellular,
        }
    }

    #[inline]
    fn scaled3(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        [x * self.frequency, y * self.frequency, z * self.frequency]
    }
}

impl NoiseField for NoiseSource {
    fn simplex_2d(&self, x: f64, z: f64) -> f64 {
        self.simplex.get([x * self.frequency, z * self.frequency])
    }

    fn simplex_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex.get(self.scaled3(x, y, z))
    }

    fn perlin_fractal_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin_fractal.get(self.scaled3(x, y, z))
    }

    fn simplex_fractal_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex_fractal.get(self.scaled3(x, y, z))
    }

    fn cellular_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.cellular.get(self.scaled3(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_samples() {
        let settings = NoiseSettings::default();
        let a = NoiseSource::new(1337, &settings);
        let b = NoiseSource::new(1337, &settings);
        for i in 0..32 {
            let p = i as f64 * 13.7;
            assert_eq!(a.simplex_2d(p, -p), b.simplex_2d(p, -p));
            assert_eq!(a.cellular_3d(p, p * 0.5, -p), b.cellular_3d(p, p * 0.5, -p));
            assert_eq!(a.perlin_fractal_3d(p, 3.0, p), b.perlin_fractal_3d(p, 3.0, p));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let settings = NoiseSettings::default();
        let a = NoiseSource::new(1, &settings);
        let b = NoiseSource::new(2, &settings);
        let differs = (0..64).any(|i| {
            let p = i as f64 * 31.3 + 0.5;
            a.simplex_2d(p, p * 0.3) != b.simplex_2d(p, p * 0.3)
        });
        assert!(differs);
    }

    #[test]
    fn simplex_stays_in_range() {
        let source = NoiseSource::new(99, &NoiseSettings::default());
        for i in 0..256 {
            let p = i as f64 * 7.1;
            let v = source.simplex_2d(p, p * 1.7);
            assert!((-1.5..=1.5).contains(&v), "sample {v} out of range");
        }
    }
}
