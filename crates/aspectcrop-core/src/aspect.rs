//! Aspect-ratio classification against the accepted target set.
//!
//! An image passes when its width/height ratio lies within the configured
//! tolerance of any target. Images that fail are flagged for cropping, and
//! the nearest target is offered as the recommended crop ratio.

use serde::Serialize;

use crate::config::{AspectConfig, AspectTarget, ConfigError};

/// Result of classifying a width/height pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectClass {
    /// Width divided by height.
    pub ratio: f64,
    /// Whether the ratio is within tolerance of some target.
    pub is_accepted: bool,
    /// Target closest to `ratio`; first in list order on ties.
    pub nearest: AspectTarget,
}

/// Classify an image by its dimensions.
///
/// Callers must pass `height > 0`. A zero height yields a non-finite ratio,
/// which is never accepted.
///
/// # Errors
///
/// `ConfigError::NoTargets` if `config.targets` is empty.
///
/// # Example
///
/// ```ignore
/// let class = classify(1300, 1000, &AspectConfig::default())?;
/// assert!(!class.is_accepted);
/// assert_eq!(class.nearest.name, "1:1");
/// ```
pub fn classify(width: u32, height: u32, config: &AspectConfig) -> Result<AspectClass, ConfigError> {
    classify_ratio(width as f64 / height as f64, config)
}

/// Classify a precomputed ratio.
///
/// # Errors
///
/// `ConfigError::NoTargets` if `config.targets` is empty.
pub fn classify_ratio(ratio: f64, config: &AspectConfig) -> Result<AspectClass, ConfigError> {
    let nearest = nearest_target(ratio, &config.targets).ok_or(ConfigError::NoTargets)?;
    let is_accepted = config
        .targets
        .iter()
        .any(|t| (ratio - t.value).abs() <= config.tolerance);

    Ok(AspectClass {
        ratio,
        is_accepted,
        nearest: nearest.clone(),
    })
}

/// Target minimising `|t.value - ratio|`.
///
/// Strict comparison keeps the earliest target when distances tie, and a NaN
/// ratio falls back to the first target. `None` for an empty list.
fn nearest_target(ratio: f64, targets: &[AspectTarget]) -> Option<&AspectTarget> {
    let (first, rest) = targets.split_first()?;
    let mut best = first;
    let mut best_distance = (best.value - ratio).abs();

    for target in rest {
        let distance = (target.value - ratio).abs();
        if distance < best_distance {
            best = target;
            best_distance = distance;
        }
    }

    Some(best)
}

/// Badge text for a ratio: the matching target name, or the ratio itself.
pub fn aspect_label(ratio: f64, config: &AspectConfig) -> String {
    config
        .targets
        .iter()
        .find(|t| (ratio - t.value).abs() <= config.tolerance)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("{:.2}", ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(values: &[f64]) -> AspectConfig {
        AspectConfig {
            targets: values
                .iter()
                .map(|v| AspectTarget::new(format!("{v}"), "", *v))
                .collect(),
            tolerance: 0.02,
        }
    }

    #[test]
    fn test_ratio_is_plain_division() {
        let class = classify(1920, 1080, &AspectConfig::default()).unwrap();
        assert_eq!(class.ratio, 1920.0 / 1080.0);
    }

    #[test]
    fn test_square_is_accepted() {
        let class = classify(1000, 1000, &AspectConfig::default()).unwrap();
        assert!(class.is_accepted);
        assert_eq!(class.nearest.name, "1:1");
    }

    #[test]
    fn test_portrait_is_accepted() {
        let class = classify(1080, 1350, &AspectConfig::default()).unwrap();
        assert!(class.is_accepted);
        assert_eq!(class.nearest.name, "4:5");
    }

    #[test]
    fn test_landscape_is_accepted() {
        let class = classify(1910, 1000, &AspectConfig::default()).unwrap();
        assert!(class.is_accepted);
        assert_eq!(class.nearest.name, "1.91:1");
    }

    #[test]
    fn test_ratio_1_3_recommends_square() {
        let config = targets(&[1.0, 0.8, 1.91]);
        let class = classify_ratio(1.3, &config).unwrap();

        assert!(!class.is_accepted);
        assert_eq!(class.nearest.value, 1.0);
    }

    #[test]
    fn test_tolerance_edge_is_inclusive() {
        let config = AspectConfig {
            targets: vec![AspectTarget::new("2:1", "", 2.0)],
            tolerance: 0.25,
        };
        // 2.25 - 2.0 is exactly representable
        assert!(classify_ratio(2.25, &config).unwrap().is_accepted);
        assert!(!classify_ratio(2.2500001, &config).unwrap().is_accepted);
    }

    #[test]
    fn test_tie_goes_to_first_target() {
        let config = targets(&[1.0, 2.0]);
        let class = classify_ratio(1.5, &config).unwrap();
        assert_eq!(class.nearest.value, 1.0);

        let reversed = targets(&[2.0, 1.0]);
        let class = classify_ratio(1.5, &reversed).unwrap();
        assert_eq!(class.nearest.value, 2.0);
    }

    #[test]
    fn test_zero_height_not_accepted() {
        let class = classify(100, 0, &AspectConfig::default()).unwrap();
        assert!(class.ratio.is_infinite());
        assert!(!class.is_accepted);
        // Every distance is infinite, so no later target beats the first
        assert_eq!(class.nearest.name, "1:1");
    }

    #[test]
    fn test_zero_by_zero_falls_back_to_first() {
        let class = classify(0, 0, &AspectConfig::default()).unwrap();
        assert!(class.ratio.is_nan());
        assert!(!class.is_accepted);
        assert_eq!(class.nearest.name, "1:1");
    }

    #[test]
    fn test_empty_targets_is_error() {
        let config = AspectConfig {
            targets: vec![],
            tolerance: 0.02,
        };
        assert_eq!(classify(10, 10, &config), Err(ConfigError::NoTargets));
        assert_eq!(classify_ratio(1.0, &config), Err(ConfigError::NoTargets));
        assert_eq!(aspect_label(1.0, &config), "1.00");
    }

    #[test]
    fn test_aspect_label() {
        let config = AspectConfig::default();
        assert_eq!(aspect_label(1.0, &config), "1:1");
        assert_eq!(aspect_label(0.81, &config), "4:5");
        assert_eq!(aspect_label(1.9, &config), "1.91:1");
        assert_eq!(aspect_label(1.3, &config), "1.30");
        assert_eq!(aspect_label(16.0 / 9.0, &config), "1.78");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
