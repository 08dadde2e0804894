use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub balls: [u8; 5],
    pub stars: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Balls,
    Stars,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Balls => 50,
            Pool::Stars => 12,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Balls => 5,
            Pool::Stars => 2,
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Balls => &draw.balls,
            Pool::Stars => &draw.stars,
        }
    }

    /// Probabilité a priori qu'une valeur sorte dans un tirage (5/50 ou 2/12).
    pub fn draw_probability(&self) -> f64 {
        self.pick_count() as f64 / self.size() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Stable,
    Down,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "↗"),
            TrendDirection::Stable => write!(f, "→"),
            TrendDirection::Down => write!(f, "↘"),
        }
    }
}

/// Statistiques d'une valeur, agrégées sur les fenêtres configurées.
/// Immuable une fois calculée ; recalculée en bloc à chaque rafraîchissement.
#[derive(Debug, Clone)]
pub struct ValueStat {
    pub value: u8,
    pub frequency: u32,
    pub trend_score: u8,
    pub trend_direction: TrendDirection,
    pub absence: u32,
    pub surrepr_z: f64,
}

/// Combinaison (nombre de boules, nombre d'étoiles) validée par la table
/// officielle des grilles multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub balls: usize,
    pub stars: usize,
}

// (boules, étoiles, prix en euros)
const TARIFF_TABLE: &[(usize, usize, f64)] = &[
    (5, 2, 2.50),
    (5, 3, 10.00),
    (5, 4, 25.00),
    (5, 5, 50.00),
    (6, 2, 15.00),
    (6, 3, 60.00),
    (6, 4, 150.00),
    (6, 5, 300.00),
    (7, 2, 52.50),
    (7, 3, 210.00),
    (7, 4, 525.00),
    (7, 5, 1050.00),
    (8, 2, 140.00),
    (8, 3, 560.00),
    (8, 4, 1400.00),
    (9, 2, 315.00),
    (9, 3, 1260.00),
    (10, 2, 630.00),
];

impl Tariff {
    pub fn new(balls: usize, stars: usize) -> Result<Self> {
        let tariff = Tariff { balls, stars };
        tariff.validate()?;
        Ok(tariff)
    }

    pub fn validate(&self) -> Result<()> {
        if self.price().is_none() {
            bail!(
                "Combinaison non tarifée : {} boules / {} étoiles",
                self.balls,
                self.stars
            );
        }
        Ok(())
    }

    pub fn price(&self) -> Option<f64> {
        TARIFF_TABLE
            .iter()
            .find(|(b, s, _)| *b == self.balls && *s == self.stars)
            .map(|(_, _, p)| *p)
    }

    pub fn count_for(&self, pool: Pool) -> usize {
        match pool {
            Pool::Balls => self.balls,
            Pool::Stars => self.stars,
        }
    }
}

pub fn validate_draw(balls: &[u8; 5], stars: &[u8; 2]) -> Result<()> {
    for &b in balls {
        if b < 1 || b > 50 {
            bail!("Boule {} hors limites (1-50)", b);
        }
    }
    for &s in stars {
        if s < 1 || s > 12 {
            bail!("Étoile {} hors limites (1-12)", s);
        }
    }
    for i in 0..balls.len() {
        for j in (i + 1)..balls.len() {
            if balls[i] == balls[j] {
                bail!("Boule en double : {}", balls[i]);
            }
        }
    }
    if stars[0] == stars[1] {
        bail!("Étoile en double : {}", stars[0]);
    }
    Ok(())
}
