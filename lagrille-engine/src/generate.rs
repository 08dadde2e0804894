use std::collections::HashMap;

use anyhow::Result;
use rand::Rng;

use lagrille_stats::models::{Pool, Tariff};
use lagrille_stats::stats::StatsSnapshot;

use crate::config::{Category, PoolLimits, SelectionRequest};
use crate::dormeur::apply_dormancy;
use crate::pools::{build_pools, RankedPools};
use crate::resolver;
use crate::selector::{select, SelectionResult};

/// Grille générée : une sélection par axe, chaque valeur étiquetée.
#[derive(Debug, Clone)]
pub struct Grille {
    pub balls: SelectionResult,
    pub stars: SelectionResult,
}

impl Grille {
    /// Prix de la combinaison si elle figure à la table des tarifs.
    pub fn price(&self) -> Option<f64> {
        Tariff {
            balls: self.balls.values.len(),
            stars: self.stars.values.len(),
        }
        .price()
    }
}

/// Moteur de génération : viviers dérivés une fois par instantané
/// statistique, puis réutilisés par toutes les générations. Le moteur ne
/// porte aucun état mutable : des générations concurrentes sur le même
/// instantané ne s'influencent pas.
pub struct GrilleEngine {
    balls_pools: RankedPools,
    stars_pools: RankedPools,
    balls_limits: PoolLimits,
    stars_limits: PoolLimits,
}

impl GrilleEngine {
    pub fn new(snapshot: &StatsSnapshot) -> Result<Self> {
        Self::with_limits(
            snapshot,
            PoolLimits::for_pool(Pool::Balls),
            PoolLimits::for_pool(Pool::Stars),
        )
    }

    pub fn with_limits(
        snapshot: &StatsSnapshot,
        balls_limits: PoolLimits,
        stars_limits: PoolLimits,
    ) -> Result<Self> {
        Ok(Self {
            balls_pools: build_pools(&snapshot.balls, Pool::Balls)?,
            stars_pools: build_pools(&snapshot.stars, Pool::Stars)?,
            balls_limits,
            stars_limits,
        })
    }

    pub fn pools_for(&self, pool: Pool) -> &RankedPools {
        match pool {
            Pool::Balls => &self.balls_pools,
            Pool::Stars => &self.stars_pools,
        }
    }

    pub fn limits_for(&self, pool: Pool) -> &PoolLimits {
        match pool {
            Pool::Balls => &self.balls_limits,
            Pool::Stars => &self.stars_limits,
        }
    }

    /// Génère une grille complète : sélection puis remplacement dormeur
    /// optionnel, axe par axe. Le résultat n'existe qu'au retour, aucun
    /// effet de bord avant.
    pub fn generate<R: Rng>(
        &self,
        balls_request: &SelectionRequest,
        stars_request: &SelectionRequest,
        rng: &mut R,
    ) -> Result<Grille> {
        let balls = self.generate_axis(Pool::Balls, balls_request, rng)?;
        let stars = self.generate_axis(Pool::Stars, stars_request, rng)?;
        Ok(Grille { balls, stars })
    }

    fn generate_axis<R: Rng>(
        &self,
        pool: Pool,
        request: &SelectionRequest,
        rng: &mut R,
    ) -> Result<SelectionResult> {
        let pools = self.pools_for(pool);
        let limits = self.limits_for(pool);
        let (result, selection_scores) = select(pools, request, limits, pool, rng)?;
        if request.dormant_percent > 0 {
            return Ok(self.replace_dormant(pool, &result, &selection_scores, request.dormant_percent));
        }
        Ok(result)
    }

    fn replace_dormant(
        &self,
        pool: Pool,
        result: &SelectionResult,
        selection_scores: &HashMap<u8, f64>,
        percent: u8,
    ) -> SelectionResult {
        apply_dormancy(
            result,
            selection_scores,
            &self.pools_for(pool).by_dormancy,
            percent,
        )
    }

    /// Étiquetage paresseux d'une valeur choisie hors génération
    /// (saisie manuelle) : dormeur avant haute fréquence, sinon rien.
    pub fn resolve_source(&self, value: u8, pool: Pool) -> Option<Category> {
        resolver::resolve(value, self.pools_for(pool), self.limits_for(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lagrille_stats::stats::make_test_draws;
    use lagrille_stats::windows::WindowConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> GrilleEngine {
        let draws = make_test_draws(60);
        let snapshot = StatsSnapshot::compute(&draws, WindowConfig::default()).unwrap();
        GrilleEngine::new(&snapshot).unwrap()
    }

    fn request(pool: Pool, tariff: &Tariff) -> SelectionRequest {
        SelectionRequest {
            total_target: tariff.count_for(pool),
            category_wants: vec![
                (Category::Haute, tariff.count_for(pool).saturating_sub(1)),
                (Category::Dormeur, 1),
            ],
            chaos_level: 4,
            trend_level: 6,
            dormant_percent: 0,
        }
    }

    #[test]
    fn test_generate_hits_tariff_exactly() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(42);
        for (b, s) in [(5, 2), (7, 3), (10, 2)] {
            let tariff = Tariff::new(b, s).unwrap();
            let grille = engine
                .generate(
                    &request(Pool::Balls, &tariff),
                    &request(Pool::Stars, &tariff),
                    &mut rng,
                )
                .unwrap();
            assert_eq!(grille.balls.values.len(), b);
            assert_eq!(grille.stars.values.len(), s);
        }
    }

    #[test]
    fn test_generate_values_in_universe_and_tagged() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(7);
        let tariff = Tariff::new(5, 2).unwrap();
        let grille = engine
            .generate(
                &request(Pool::Balls, &tariff),
                &request(Pool::Stars, &tariff),
                &mut rng,
            )
            .unwrap();
        for v in &grille.balls.values {
            assert!((1..=50).contains(v));
            assert!(grille.balls.source_of.contains_key(v));
        }
        for v in &grille.stars.values {
            assert!((1..=12).contains(v));
            assert!(grille.stars.source_of.contains_key(v));
        }
    }

    #[test]
    fn test_generate_price() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(11);
        let tariff = Tariff::new(6, 3).unwrap();
        let grille = engine
            .generate(
                &request(Pool::Balls, &tariff),
                &request(Pool::Stars, &tariff),
                &mut rng,
            )
            .unwrap();
        assert_eq!(grille.price(), Some(60.00));
    }

    #[test]
    fn test_dormant_percent_swaps_membership_only() {
        let engine = engine();
        let tariff = Tariff::new(5, 2).unwrap();
        let mut with_dormant = request(Pool::Balls, &tariff);
        with_dormant.chaos_level = 0;
        with_dormant.dormant_percent = 10;
        let mut rng = StdRng::seed_from_u64(3);
        let stars_req = request(Pool::Stars, &tariff);
        let grille = engine.generate(&with_dormant, &stars_req, &mut rng).unwrap();
        assert_eq!(grille.balls.values.len(), 5, "le dormeur ne change pas la taille");
        let dormant_count = grille
            .balls
            .source_of
            .values()
            .filter(|c| **c == Category::Dormeur)
            .count();
        assert!(dormant_count >= 5, "percent 10 doit renouveler toute la sélection");
    }

    #[test]
    fn test_generate_rejects_oversized_target() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(1);
        let bad = SelectionRequest::simple(13);
        let ok = SelectionRequest::simple(2);
        assert!(engine.generate(&SelectionRequest::simple(5), &bad, &mut rng).is_err());
        // Un échec de précondition ne produit rien : l'appel suivant
        // fonctionne normalement sur le même moteur
        assert!(engine.generate(&SelectionRequest::simple(5), &ok, &mut rng).is_ok());
    }

    #[test]
    fn test_resolve_source_matches_windows() {
        let engine = engine();
        let pools = engine.pools_for(Pool::Balls);
        let limits = engine.limits_for(Pool::Balls);
        let top_dormeur = pools.by_dormancy[0].value;
        assert_eq!(
            engine.resolve_source(top_dormeur, Pool::Balls),
            Some(Category::Dormeur)
        );
        let top_haute = pools.by_frequency[0].value;
        let expected = if pools.by_dormancy[..limits.dormeur]
            .iter()
            .any(|s| s.value == top_haute)
        {
            Category::Dormeur
        } else {
            Category::Haute
        };
        assert_eq!(engine.resolve_source(top_haute, Pool::Balls), Some(expected));
    }

    #[test]
    fn test_same_snapshot_same_zero_chaos_result() {
        let draws = make_test_draws(60);
        let snapshot = StatsSnapshot::compute(&draws, WindowConfig::default()).unwrap();
        let engine = GrilleEngine::new(&snapshot).unwrap();
        let mut req = SelectionRequest::simple(5);
        req.trend_level = 5;
        let stars_req = SelectionRequest::simple(2);
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);
        let a = engine.generate(&req, &stars_req, &mut rng1).unwrap();
        let b = engine.generate(&req, &stars_req, &mut rng2).unwrap();
        assert_eq!(a.balls.values, b.balls.values);
        assert_eq!(a.stars.values, b.stars.values);
    }
}
