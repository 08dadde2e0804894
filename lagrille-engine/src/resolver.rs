use crate::config::{Category, PoolLimits};
use crate::pools::RankedPools;

/// Retrouve la catégorie d'affichage d'une valeur dont la provenance n'a pas
/// été enregistrée au moment de la sélection (saisie manuelle, complétion).
///
/// Règle de précédence unique, appliquée partout : la fenêtre visible des
/// dormeurs l'emporte sur celle des hautes fréquences. Une valeur absente
/// des deux fenêtres n'a pas de catégorie.
pub fn resolve(value: u8, pools: &RankedPools, limits: &PoolLimits) -> Option<Category> {
    if in_visible_window(value, pools, limits, Category::Dormeur) {
        return Some(Category::Dormeur);
    }
    if in_visible_window(value, pools, limits, Category::Haute) {
        return Some(Category::Haute);
    }
    None
}

pub(crate) fn in_visible_window(
    value: u8,
    pools: &RankedPools,
    limits: &PoolLimits,
    category: Category,
) -> bool {
    let ranked = pools.ranked_for(category);
    let n = limits.limit_for(category).min(ranked.len());
    ranked[..n].iter().any(|s| s.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::build_pools;
    use lagrille_stats::models::{Pool, TrendDirection, ValueStat};

    /// Étoiles avec fréquence croissante et retard décroissant : la fenêtre
    /// haute contient les grandes valeurs, la fenêtre dormeur les petites.
    fn star_pools() -> RankedPools {
        let stats: Vec<ValueStat> = (1..=12)
            .map(|value| ValueStat {
                value,
                frequency: value as u32,
                trend_score: 5,
                trend_direction: TrendDirection::Stable,
                absence: 13 - value as u32,
                surrepr_z: 0.0,
            })
            .collect();
        build_pools(&stats, Pool::Stars).unwrap()
    }

    fn limits() -> PoolLimits {
        PoolLimits {
            haute: 3,
            dormeur: 3,
            tendance: 3,
            surrepr: 3,
        }
    }

    #[test]
    fn test_resolve_haute() {
        let pools = star_pools();
        // Fenêtre haute = valeurs 12, 11, 10
        assert_eq!(resolve(12, &pools, &limits()), Some(Category::Haute));
        assert_eq!(resolve(10, &pools, &limits()), Some(Category::Haute));
    }

    #[test]
    fn test_resolve_dormeur() {
        let pools = star_pools();
        // Fenêtre dormeur = valeurs 1, 2, 3 (retards 12, 11, 10)
        assert_eq!(resolve(1, &pools, &limits()), Some(Category::Dormeur));
        assert_eq!(resolve(3, &pools, &limits()), Some(Category::Dormeur));
    }

    #[test]
    fn test_resolve_outside_windows() {
        let pools = star_pools();
        assert_eq!(resolve(6, &pools, &limits()), None);
    }

    #[test]
    fn test_dormeur_takes_precedence() {
        // Valeur 5 à la fois très fréquente et très en retard
        let mut stats: Vec<ValueStat> = (1..=12)
            .map(|value| ValueStat {
                value,
                frequency: value as u32,
                trend_score: 5,
                trend_direction: TrendDirection::Stable,
                absence: 0,
                surrepr_z: 0.0,
            })
            .collect();
        stats[4].frequency = 100;
        stats[4].absence = 100;
        let pools = build_pools(&stats, Pool::Stars).unwrap();
        assert_eq!(resolve(5, &pools, &limits()), Some(Category::Dormeur));
    }

    #[test]
    fn test_window_wider_than_universe() {
        let pools = star_pools();
        let wide = PoolLimits {
            haute: 100,
            dormeur: 100,
            tendance: 100,
            surrepr: 100,
        };
        // Tout l'univers est visible : le dormeur gagne toujours
        assert_eq!(resolve(12, &pools, &wide), Some(Category::Dormeur));
    }
}
