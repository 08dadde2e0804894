use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use lagrille_stats::models::Pool;

/// Catégorie d'origine d'une valeur sélectionnée.
/// La priorité d'étiquetage est toujours : dormeur avant haute fréquence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dormeur,
    Haute,
    Tendance,
    Surrepresentation,
    /// Valeur issue de l'étape de complétion, hors fenêtres visibles
    Complement,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Dormeur => write!(f, "DORMEUR"),
            Category::Haute => write!(f, "HAUTE"),
            Category::Tendance => write!(f, "TENDANCE"),
            Category::Surrepresentation => write!(f, "SURREPR"),
            Category::Complement => write!(f, "-"),
        }
    }
}

/// Tailles maximales des viviers visibles, une par catégorie.
/// Configuration externe : l'interface peut les élargir quand le chaos
/// augmente, le sélecteur se contente de les honorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolLimits {
    pub haute: usize,
    pub dormeur: usize,
    pub tendance: usize,
    pub surrepr: usize,
}

impl PoolLimits {
    pub fn for_pool(pool: Pool) -> Self {
        match pool {
            Pool::Balls => Self {
                haute: 15,
                dormeur: 15,
                tendance: 12,
                surrepr: 12,
            },
            Pool::Stars => Self {
                haute: 6,
                dormeur: 6,
                tendance: 5,
                surrepr: 5,
            },
        }
    }

    pub fn limit_for(&self, category: Category) -> usize {
        match category {
            Category::Haute => self.haute,
            Category::Dormeur => self.dormeur,
            Category::Tendance => self.tendance,
            Category::Surrepresentation => self.surrepr,
            Category::Complement => 0,
        }
    }
}

/// Demande de sélection pour un axe (boules ou étoiles).
///
/// `category_wants` est ordonnée : l'écrêtage des quotas réduit la dernière
/// entrée en premier et remonte la liste (politique configurable par
/// réordonnancement, pas de précédence câblée).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub total_target: usize,
    pub category_wants: Vec<(Category, usize)>,
    /// Bruit aléatoire, 0-10
    pub chaos_level: u8,
    /// Influence de la tendance, 0-10
    pub trend_level: u8,
    /// Pourcentage de dormeurs injectés après sélection, 0-10
    pub dormant_percent: u8,
}

impl SelectionRequest {
    /// Demande par défaut : tout le quota sur la haute fréquence.
    pub fn simple(total_target: usize) -> Self {
        Self {
            total_target,
            category_wants: vec![(Category::Haute, total_target)],
            chaos_level: 0,
            trend_level: 0,
            dormant_percent: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chaos_level > 10 {
            bail!("Niveau de chaos invalide : {} (0-10)", self.chaos_level);
        }
        if self.trend_level > 10 {
            bail!("Niveau de tendance invalide : {} (0-10)", self.trend_level);
        }
        if self.dormant_percent > 10 {
            bail!("Pourcentage dormeur invalide : {} (0-10)", self.dormant_percent);
        }
        if self
            .category_wants
            .iter()
            .any(|(c, _)| *c == Category::Complement)
        {
            bail!("La catégorie complément n'est pas un vivier sélectionnable");
        }
        Ok(())
    }
}
