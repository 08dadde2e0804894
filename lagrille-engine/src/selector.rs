use std::collections::HashMap;

use anyhow::{bail, Result};
use rand::Rng;

use lagrille_stats::models::{Pool, ValueStat};

use crate::config::{Category, PoolLimits, SelectionRequest};
use crate::pools::RankedPools;
use crate::resolver;
use crate::scorer::score_candidates;

/// Résultat d'une passe de sélection sur un axe. Produit exclusivement par
/// le moteur ; les appelants le lisent, ne le modifient pas.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// Valeurs retenues, triées croissantes, sans doublon,
    /// exactement `total_target` entrées
    pub values: Vec<u8>,
    /// Catégorie d'origine de chaque valeur retenue
    pub source_of: HashMap<u8, Category>,
}

impl SelectionResult {
    pub fn contains(&self, value: u8) -> bool {
        self.values.contains(&value)
    }
}

/// Écrête les quotas jusqu'à ce que leur somme tienne dans la cible :
/// la dernière entrée est réduite en premier, puis on remonte la liste.
/// Aucun quota n'est jamais augmenté ici (la complétion s'en charge).
pub fn clamp_wants(wants: &[(Category, usize)], total_target: usize) -> Vec<(Category, usize)> {
    let mut clamped: Vec<(Category, usize)> = wants.to_vec();
    let mut sum: usize = clamped.iter().map(|(_, n)| n).sum();
    let mut i = clamped.len();
    while sum > total_target && i > 0 {
        i -= 1;
        let cut = (sum - total_target).min(clamped[i].1);
        clamped[i].1 -= cut;
        sum -= cut;
    }
    clamped
}

fn working_pool<'a>(pools: &'a RankedPools, category: Category, limits: &PoolLimits) -> &'a [ValueStat] {
    let ranked = pools.ranked_for(category);
    let n = limits.limit_for(category).min(ranked.len());
    &ranked[..n]
}

/// Sélection « fréquence d'abord, quotas contraints, complétion » :
/// 1. écrêtage des quotas ;
/// 2. pour chaque catégorie dans l'ordre, notation de son vivier visible
///    (moins les valeurs déjà prises) et prise du quota ;
/// 3. complétion sur l'union dédupliquée des viviers si la cible n'est pas
///    atteinte ;
/// 4. étiquetage avec priorité au dormeur ;
/// 5. scores de sélection retenus par valeur pour le remplacement dormeur.
pub fn select<R: Rng>(
    pools: &RankedPools,
    request: &SelectionRequest,
    limits: &PoolLimits,
    pool: Pool,
    rng: &mut R,
) -> Result<(SelectionResult, HashMap<u8, f64>)> {
    request.validate()?;
    if request.total_target > pool.size() {
        bail!(
            "Cible {} au-delà de l'univers ({} valeurs)",
            request.total_target,
            pool.size()
        );
    }

    let wants = clamp_wants(&request.category_wants, request.total_target);

    // Union dédupliquée des viviers de la demande (tous les viviers si la
    // demande est vide), dans l'ordre des quotas. C'est le vivier de
    // complétion, et la précondition de faisabilité.
    let union_categories: Vec<Category> = if wants.is_empty() {
        vec![
            Category::Haute,
            Category::Dormeur,
            Category::Tendance,
            Category::Surrepresentation,
        ]
    } else {
        wants.iter().map(|(c, _)| *c).collect()
    };
    let mut union: Vec<ValueStat> = Vec::new();
    for &category in &union_categories {
        for s in working_pool(pools, category, limits) {
            if !union.iter().any(|u| u.value == s.value) {
                union.push(s.clone());
            }
        }
    }
    if union.len() < request.total_target {
        bail!(
            "Viviers insuffisants : {} candidats distincts pour une cible de {}",
            union.len(),
            request.total_target
        );
    }

    let mut picked: Vec<u8> = Vec::with_capacity(request.total_target);
    let mut source_of: HashMap<u8, Category> = HashMap::new();
    let mut selection_scores: HashMap<u8, f64> = HashMap::new();

    for &(category, want) in &wants {
        if want == 0 {
            continue;
        }
        let candidates: Vec<ValueStat> = working_pool(pools, category, limits)
            .iter()
            .filter(|s| !picked.contains(&s.value))
            .cloned()
            .collect();
        let scored = score_candidates(&candidates, request.chaos_level, request.trend_level, rng);
        for c in scored.iter().take(want) {
            picked.push(c.value);
            // Étiquette = vivier de pioche ; seule exception, le dormeur
            // l'emporte quand sa fenêtre visible contient la valeur
            let source = if category != Category::Dormeur
                && resolver::in_visible_window(c.value, pools, limits, Category::Dormeur)
            {
                Category::Dormeur
            } else {
                category
            };
            source_of.insert(c.value, source);
            selection_scores.insert(c.value, c.final_score);
        }
    }

    // Complétion : les quotas peuvent laisser la cible inatteinte
    // (sous-allocation ou viviers en partie épuisés)
    if picked.len() < request.total_target {
        let remaining: Vec<ValueStat> = union
            .iter()
            .filter(|s| !picked.contains(&s.value))
            .cloned()
            .collect();
        let scored = score_candidates(&remaining, request.chaos_level, request.trend_level, rng);
        let needed = request.total_target - picked.len();
        for c in scored.iter().take(needed) {
            picked.push(c.value);
            let source = resolver::resolve(c.value, pools, limits).unwrap_or(Category::Complement);
            source_of.insert(c.value, source);
            selection_scores.insert(c.value, c.final_score);
        }
    }

    // La précondition sur l'union garantit l'atteinte de la cible
    debug_assert_eq!(picked.len(), request.total_target);

    picked.sort();
    Ok((
        SelectionResult {
            values: picked,
            source_of,
        },
        selection_scores,
    ))
}
