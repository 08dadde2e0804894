mod display;
mod import;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lagrille_engine::{Category, GrilleEngine, SelectionRequest};
use lagrille_stats::models::{Pool, Tariff};
use lagrille_stats::stats::StatsSnapshot;
use lagrille_stats::windows::WindowConfig;

use crate::display::{display_grille, display_import_summary, display_stats};
use crate::import::load_history;

#[derive(Parser)]
#[command(name = "lagrille", about = "Générateur de grilles EuroMillions pondéré par l'historique")]
struct Cli {
    /// Fichier CSV de l'historique (id;date;b1..b5;s1;s2, du plus ancien au plus récent)
    #[arg(short, long, default_value = "assets/historique.csv")]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct WindowArgs {
    /// Fenêtre des hautes fréquences (tirages)
    #[arg(long, default_value = "100")]
    fenetre_haute: usize,

    /// Fenêtre de tendance
    #[arg(long, default_value = "30")]
    fenetre_tendance: usize,

    /// Fenêtre des dormeurs
    #[arg(long, default_value = "150")]
    fenetre_dormeur: usize,

    /// Fenêtre de surreprésentation
    #[arg(long, default_value = "200")]
    fenetre_surrepr: usize,
}

impl WindowArgs {
    fn to_config(&self) -> WindowConfig {
        WindowConfig {
            haute: self.fenetre_haute,
            tendance: self.fenetre_tendance,
            dormeur: self.fenetre_dormeur,
            surrepr: self.fenetre_surrepr,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Afficher les statistiques par valeur (fréquence, tendance, retard, z-score)
    Stats {
        #[command(flatten)]
        windows: WindowArgs,
    },

    /// Générer une grille
    Generer {
        /// Nombre de boules (5-10)
        #[arg(short, long, default_value = "5")]
        boules: usize,

        /// Nombre d'étoiles (2-5)
        #[arg(short, long, default_value = "2")]
        etoiles: usize,

        /// Niveau de chaos, 0-10
        #[arg(long, default_value = "0")]
        chaos: u8,

        /// Influence de la tendance, 0-10
        #[arg(long, default_value = "0")]
        tendance: u8,

        /// Pourcentage de dormeurs injectés après sélection, 0-10
        #[arg(long, default_value = "0")]
        dormeur: u8,

        /// Quota de boules piochées dans le vivier dormeur
        #[arg(long, default_value = "0")]
        quota_dormeur: usize,

        /// Seed pour la reproductibilité (par défaut : dérivé de la date)
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        windows: WindowArgs,
    },
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let history = load_history(&cli.file)?;
    if history.draws.is_empty() {
        bail!("Historique vide : {:?}", cli.file);
    }

    match cli.command {
        Command::Stats { windows } => cmd_stats(&history, &windows.to_config()),
        Command::Generer {
            boules,
            etoiles,
            chaos,
            tendance,
            dormeur,
            quota_dormeur,
            seed,
            windows,
        } => cmd_generer(
            &history,
            &windows.to_config(),
            boules,
            etoiles,
            chaos,
            tendance,
            dormeur,
            quota_dormeur,
            seed,
        ),
    }
}

fn cmd_stats(history: &import::ImportResult, windows: &WindowConfig) -> Result<()> {
    display_import_summary(history.total_records, history.draws.len(), history.errors);
    let snapshot = StatsSnapshot::compute(&history.draws, *windows)?;
    display_stats(&snapshot.balls, &snapshot.stars, windows);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_generer(
    history: &import::ImportResult,
    windows: &WindowConfig,
    boules: usize,
    etoiles: usize,
    chaos: u8,
    tendance: u8,
    dormeur: u8,
    quota_dormeur: usize,
    seed: Option<u64>,
) -> Result<()> {
    let tariff = Tariff::new(boules, etoiles)?;
    let snapshot = StatsSnapshot::compute(&history.draws, *windows)?;
    let engine = GrilleEngine::new(&snapshot)?;

    let balls_request = build_request(&tariff, Pool::Balls, chaos, tendance, dormeur, quota_dormeur);
    let stars_request = build_request(&tariff, Pool::Stars, chaos, tendance, dormeur, 0);

    let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(date_seed));
    let grille = engine.generate(&balls_request, &stars_request, &mut rng)?;

    display_grille(&grille);
    Ok(())
}

fn build_request(
    tariff: &Tariff,
    pool: Pool,
    chaos: u8,
    tendance: u8,
    dormeur: u8,
    quota_dormeur: usize,
) -> SelectionRequest {
    let target = tariff.count_for(pool);
    let quota_dormeur = quota_dormeur.min(target);
    SelectionRequest {
        total_target: target,
        category_wants: vec![
            (Category::Haute, target - quota_dormeur),
            (Category::Dormeur, quota_dormeur),
        ],
        chaos_level: chaos,
        trend_level: tendance,
        dormant_percent: dormeur,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        assert!(seed >= 20_000_000, "seed trop petit: {seed}");
        assert!(seed <= 99_991_231, "seed trop grand: {seed}");
        assert_eq!(seed.to_string().len(), 8);
    }

    #[test]
    fn test_build_request_quota_clamped_to_target() {
        let tariff = Tariff::new(5, 2).unwrap();
        let req = build_request(&tariff, Pool::Balls, 0, 0, 0, 9);
        assert_eq!(req.total_target, 5);
        assert_eq!(req.category_wants[0], (Category::Haute, 0));
        assert_eq!(req.category_wants[1], (Category::Dormeur, 5));
    }

    #[test]
    fn test_build_request_default_all_haute() {
        let tariff = Tariff::new(7, 3).unwrap();
        let req = build_request(&tariff, Pool::Stars, 2, 4, 1, 0);
        assert_eq!(req.total_target, 3);
        assert_eq!(req.category_wants[0], (Category::Haute, 3));
        assert_eq!(req.category_wants[1], (Category::Dormeur, 0));
    }
}
