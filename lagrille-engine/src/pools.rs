use std::cmp::Ordering;

use anyhow::{bail, Result};

use lagrille_stats::models::{Pool, ValueStat};

use crate::config::Category;

/// Les cinq ordonnancements de l'univers d'un axe, dérivés une fois par
/// instantané statistique puis réutilisés par toutes les générations.
/// Chaque vivier est une permutation complète de l'univers.
#[derive(Debug, Clone)]
pub struct RankedPools {
    pub by_value: Vec<ValueStat>,
    pub by_frequency: Vec<ValueStat>,
    pub by_trend: Vec<ValueStat>,
    pub by_dormancy: Vec<ValueStat>,
    pub by_surrepr: Vec<ValueStat>,
}

impl RankedPools {
    pub fn ranked_for(&self, category: Category) -> &[ValueStat] {
        match category {
            Category::Haute => &self.by_frequency,
            Category::Tendance => &self.by_trend,
            Category::Dormeur => &self.by_dormancy,
            Category::Surrepresentation => &self.by_surrepr,
            Category::Complement => &self.by_value,
        }
    }
}

/// Construit les cinq viviers ordonnés. Un jeu de statistiques partiel est
/// une violation de contrat : on échoue bruyamment plutôt que de tronquer.
pub fn build_pools(stats: &[ValueStat], pool: Pool) -> Result<RankedPools> {
    if stats.len() != pool.size() {
        bail!(
            "Statistiques incomplètes : {} valeurs reçues, {} attendues",
            stats.len(),
            pool.size()
        );
    }
    let mut seen = vec![false; pool.size() + 1];
    for s in stats {
        let v = s.value as usize;
        if v < 1 || v > pool.size() || seen[v] {
            bail!("Statistiques invalides : valeur {} en double ou hors univers", s.value);
        }
        seen[v] = true;
    }

    let mut by_value = stats.to_vec();
    by_value.sort_by_key(|s| s.value);

    let mut by_frequency = stats.to_vec();
    by_frequency.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(b.trend_score.cmp(&a.trend_score))
            .then(a.value.cmp(&b.value))
    });

    let mut by_trend = stats.to_vec();
    by_trend.sort_by(|a, b| {
        b.trend_score
            .cmp(&a.trend_score)
            .then(b.frequency.cmp(&a.frequency))
            .then(a.value.cmp(&b.value))
    });

    let mut by_dormancy = stats.to_vec();
    by_dormancy.sort_by(|a, b| b.absence.cmp(&a.absence).then(a.value.cmp(&b.value)));

    let mut by_surrepr = stats.to_vec();
    by_surrepr.sort_by(|a, b| {
        b.surrepr_z
            .partial_cmp(&a.surrepr_z)
            .unwrap_or(Ordering::Equal)
            .then(a.value.cmp(&b.value))
    });

    Ok(RankedPools {
        by_value,
        by_frequency,
        by_trend,
        by_dormancy,
        by_surrepr,
    })
}
