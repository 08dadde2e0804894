use serde::{Deserialize, Serialize};

/// Tailles des fenêtres d'analyse, en nombre de tirages.
/// Chaque statistique d'un `ValueStat` est calculée sur sa propre fenêtre.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Fenêtre des hautes fréquences
    pub haute: usize,
    /// Fenêtre de tendance (comparaison récent / ancien)
    pub tendance: usize,
    /// Fenêtre des dormeurs (calcul du retard)
    pub dormeur: usize,
    /// Fenêtre de surreprésentation (z-score)
    pub surrepr: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            haute: 100,
            tendance: 30,
            dormeur: 150,
            surrepr: 200,
        }
    }
}
