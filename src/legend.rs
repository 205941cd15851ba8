use serde::{Deserialize, Serialize};

use crate::layer::Layer;
use crate::palette::{ColorScale, FALLBACK_GRADIENT, FALLBACK_LABELS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendScale {
    pub colors: Vec<String>,
    pub labels: Vec<String>,
}

impl LegendScale {
    pub fn for_layer(layer: Layer) -> Self {
        let scale = ColorScale::for_layer(layer);
        Self::from_parts(&scale.colors, &scale.labels)
    }

    pub fn fallback() -> Self {
        Self::from_parts(&FALLBACK_GRADIENT, &FALLBACK_LABELS)
    }

    fn from_parts(colors: &[&str], labels: &[&str]) -> Self {
        Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Labels printed under the color strip: first, middle and last.
    pub fn tick_labels(&self) -> Vec<&str> {
        let len = self.labels.len();
        self.labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i == 0 || *i == len / 2 || *i + 1 == len)
            .map(|(_, label)| label.as_str())
            .collect()
    }
}

/// Legend for a layer name. Names that are not a known layer get the blue
/// fallback gradient.
pub fn render(layer: &str) -> LegendScale {
    match layer.parse::<Layer>() {
        Ok(layer) => LegendScale::for_layer(layer),
        Err(_) => LegendScale::fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_legend_matches_palette() {
        let legend = render("temperature");
        assert_eq!(
            legend.colors,
            ["#053061", "#4393c3", "#e6f598", "#f46d43", "#9e0142"]
        );
        assert_eq!(legend.labels[2], "0°C");
        assert_eq!(legend.tick_labels(), vec!["-3.0°C", "0°C", "+3.0°C"]);
    }

    #[test]
    fn unknown_layer_gets_sparse_gradient() {
        let legend = render("soil");
        assert_eq!(legend.colors.len(), 9);
        let populated: Vec<usize> = legend
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| !label.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(populated, vec![0, 4, 8]);
        assert_eq!(legend.tick_labels(), vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn every_layer_has_five_entries() {
        for layer in Layer::ALL {
            let legend = LegendScale::for_layer(layer);
            assert_eq!(legend.colors.len(), 5);
            assert_eq!(legend.labels.len(), 5);
        }
    }
}
