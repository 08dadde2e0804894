use std::cmp::Ordering;
use std::collections::HashMap;

use lagrille_stats::models::ValueStat;

use crate::config::Category;
use crate::selector::SelectionResult;

/// Remplacement dormeur : échange les valeurs les plus faiblement notées de
/// la sélection contre les candidats les plus en retard du vivier dormeur.
///
/// Entièrement déterministe à partir des scores de sélection et de l'ordre
/// du vivier : aucun aléa n'entre ici. Ne change jamais la taille de la
/// sélection, seulement sa composition. Si le vivier ne fournit pas assez
/// de candidats inédits, l'application est partielle : les valeurs
/// d'origine les moins faibles restent en place.
pub fn apply_dormancy(
    result: &SelectionResult,
    selection_scores: &HashMap<u8, f64>,
    dormancy_pool: &[ValueStat],
    percent: u8,
) -> SelectionResult {
    if percent == 0 || result.values.is_empty() {
        return result.clone();
    }

    let total = result.values.len();
    let mut k = ((total * percent as usize) as f64 / 10.0).round() as usize;
    // Effet visible garanti même pour les petites cibles (2 étoiles)
    if k == 0 {
        k = 1;
    }
    k = k.min(total);

    // Les scores les plus bas partent en premier ; départage par valeur
    // croissante pour rester déterministe
    let mut by_weakness: Vec<u8> = result.values.clone();
    by_weakness.sort_by(|a, b| {
        let sa = selection_scores.get(a).copied().unwrap_or(f64::INFINITY);
        let sb = selection_scores.get(b).copied().unwrap_or(f64::INFINITY);
        sa.partial_cmp(&sb).unwrap_or(Ordering::Equal).then(a.cmp(b))
    });
    let to_replace: Vec<u8> = by_weakness[..k].to_vec();
    let kept: Vec<u8> = result
        .values
        .iter()
        .copied()
        .filter(|v| !to_replace.contains(v))
        .collect();

    // Parcours du vivier dans son ordre (plus dormeur en tête)
    let mut replacements: Vec<u8> = Vec::with_capacity(k);
    for s in dormancy_pool {
        if replacements.len() >= k {
            break;
        }
        if kept.contains(&s.value) || replacements.contains(&s.value) {
            continue;
        }
        replacements.push(s.value);
    }

    let mut values: Vec<u8> = kept.clone();
    values.extend(&replacements);

    let mut source_of: HashMap<u8, Category> = HashMap::new();
    for &v in &kept {
        let tag = result.source_of.get(&v).copied().unwrap_or(Category::Complement);
        source_of.insert(v, tag);
    }
    for &v in &replacements {
        source_of.insert(v, Category::Dormeur);
    }

    // Vivier épuisé : on restaure les remplacées les moins faibles
    if values.len() < total {
        for &v in to_replace.iter().rev() {
            if values.len() >= total {
                break;
            }
            if !values.contains(&v) {
                values.push(v);
                let tag = result.source_of.get(&v).copied().unwrap_or(Category::Complement);
                source_of.insert(v, tag);
            }
        }
    }

    values.sort();
    SelectionResult { values, source_of }
}
