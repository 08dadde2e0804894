use anyhow::{bail, Result};

use crate::models::{Draw, Pool, TrendDirection, ValueStat};
use crate::windows::WindowConfig;

/// Instantané statistique immuable : un `ValueStat` par valeur, pour chaque
/// axe. Recalculé en bloc à chaque rafraîchissement de l'historique ou des
/// fenêtres ; les générations en cours lisent toujours un instantané cohérent.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub balls: Vec<ValueStat>,
    pub stars: Vec<ValueStat>,
    pub windows: WindowConfig,
}

impl StatsSnapshot {
    /// draws[0] = tirage le plus récent.
    pub fn compute(draws: &[Draw], windows: WindowConfig) -> Result<Self> {
        if draws.is_empty() {
            bail!("Historique vide : impossible de calculer les statistiques");
        }
        Ok(Self {
            balls: compute_value_stats(draws, Pool::Balls, &windows),
            stars: compute_value_stats(draws, Pool::Stars, &windows),
            windows,
        })
    }

    pub fn stats_for(&self, pool: Pool) -> &[ValueStat] {
        match pool {
            Pool::Balls => &self.balls,
            Pool::Stars => &self.stars,
        }
    }
}

/// Calcule les statistiques de toutes les valeurs d'un axe, chaque champ sur
/// sa fenêtre propre. Retourne exactement `pool.size()` entrées, triées par
/// valeur croissante.
pub fn compute_value_stats(draws: &[Draw], pool: Pool, windows: &WindowConfig) -> Vec<ValueStat> {
    (1..=pool.size() as u8)
        .map(|value| {
            let frequency = frequency_in_window(value, draws, pool, windows.haute);
            let (trend_score, trend_direction) = trend_in_window(value, draws, pool, windows.tendance);
            let absence = current_absence(value, draws, pool, windows.dormeur);
            let n = windows.surrepr.min(draws.len()) as u32;
            let k = frequency_in_window(value, draws, pool, windows.surrepr);
            let surrepr_z = surrepresentation_z(k, n, pool.draw_probability());
            ValueStat {
                value,
                frequency,
                trend_score,
                trend_direction,
                absence,
                surrepr_z,
            }
        })
        .collect()
}

fn frequency_in_window(value: u8, draws: &[Draw], pool: Pool, window: usize) -> u32 {
    let w = window.min(draws.len());
    draws[..w]
        .iter()
        .filter(|d| pool.numbers_from(d).contains(&value))
        .count() as u32
}

/// Retard : nombre de tirages depuis la dernière apparition dans la fenêtre.
/// Une valeur jamais vue reçoit la longueur effective de la fenêtre.
fn current_absence(value: u8, draws: &[Draw], pool: Pool, window: usize) -> u32 {
    let w = window.min(draws.len());
    for (i, draw) in draws[..w].iter().enumerate() {
        if pool.numbers_from(draw).contains(&value) {
            return i as u32;
        }
    }
    w as u32
}

/// Tendance : moitié récente de la fenêtre contre moitié ancienne.
/// score = 5 + (apparitions récentes - apparitions anciennes), borné à 0..10.
fn trend_in_window(value: u8, draws: &[Draw], pool: Pool, window: usize) -> (u8, TrendDirection) {
    let w = window.min(draws.len());
    let half = w / 2;

    let recent = draws[..half]
        .iter()
        .filter(|d| pool.numbers_from(d).contains(&value))
        .count() as i32;
    let older = draws[half..w]
        .iter()
        .filter(|d| pool.numbers_from(d).contains(&value))
        .count() as i32;

    let diff = recent - older;
    let score = (5 + diff).clamp(0, 10) as u8;
    let direction = match diff {
        d if d > 0 => TrendDirection::Up,
        d if d < 0 => TrendDirection::Down,
        _ => TrendDirection::Stable,
    };
    (score, direction)
}

/// Z-score de surreprésentation sous l'hypothèse binomiale nulle :
/// E = n*p0, sigma = sqrt(n*p0*(1-p0)), z = (k - E) / sigma (0 si sigma nul).
pub fn surrepresentation_z(k: u32, n: u32, p0: f64) -> f64 {
    let n = n as f64;
    let expected = n * p0;
    let sigma = (n * p0 * (1.0 - p0)).sqrt();
    if sigma > 0.0 {
        (k as f64 - expected) / sigma
    } else {
        0.0
    }
}

pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 10) as u8;
            Draw {
                draw_id: format!("{:03}", i),
                date: format!("2024-01-{:02}", (i % 28) + 1),
                balls: [
                    base * 5 + 1,
                    base * 5 + 2,
                    base * 5 + 3,
                    base * 5 + 4,
                    base * 5 + 5,
                ],
                stars: [
                    (base % 12 + 1).min(12),
                    ((base + 1) % 12 + 1).min(12),
                ],
            }
        })
        .collect()
}
