use std::cmp::Ordering;

use rand::Rng;

use lagrille_stats::models::ValueStat;

/// Candidat noté, transitoire : ne vit que le temps d'une passe de sélection.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub value: u8,
    pub frequency: u32,
    pub trend_score: u8,
    pub final_score: f64,
}

/// Note un vivier de candidats (déjà dédupliqué et filtré par l'appelant).
///
/// Seul point d'entrée de l'aléa dans tout le moteur : un tirage uniforme
/// frais par candidat à chaque appel, jamais mémoïsé. Le chaos est plafonné
/// à la moitié de l'étendue des fréquences (chaos_level / 20), la tendance
/// à l'autre moitié : la fréquence reste le signal dominant.
///
/// Tri final décroissant par score, avec un plancher déterministe sous la
/// clé aléatoire : fréquence, puis tendance, puis valeur croissante.
pub fn score_candidates<R: Rng>(
    candidates: &[ValueStat],
    chaos_level: u8,
    trend_level: u8,
    rng: &mut R,
) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let max_freq = candidates.iter().map(|s| s.frequency).max().unwrap_or(0);
    let min_freq = candidates.iter().map(|s| s.frequency).min().unwrap_or(0);
    let mut freq_range = (max_freq - min_freq) as f64;
    if freq_range == 0.0 {
        freq_range = 1.0;
    }

    let chaos_ratio = chaos_level as f64 / 20.0;
    let trend_weight = trend_level as f64 / 10.0;

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|s| {
            let trend_bonus = trend_weight * (s.trend_score as f64 / 10.0) * (freq_range * 0.5);
            let random_factor = rng.random::<f64>() * freq_range * chaos_ratio;
            ScoredCandidate {
                value: s.value,
                frequency: s.frequency,
                trend_score: s.trend_score,
                final_score: s.frequency as f64 + trend_bonus + random_factor,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then(b.frequency.cmp(&a.frequency))
            .then(b.trend_score.cmp(&a.trend_score))
            .then(a.value.cmp(&b.value))
    });

    scored
}
