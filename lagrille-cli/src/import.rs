use std::path::Path;

use anyhow::{bail, Context, Result};

use lagrille_stats::models::{validate_draw, Draw};

pub struct ImportResult {
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub errors: u32,
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;
    let date = parse_date(&get(1)?)?;

    let balls: [u8; 5] = [get_u8(2)?, get_u8(3)?, get_u8(4)?, get_u8(5)?, get_u8(6)?];
    let stars: [u8; 2] = [get_u8(7)?, get_u8(8)?];
    validate_draw(&balls, &stars)?;

    Ok(Draw {
        draw_id,
        date,
        balls,
        stars,
    })
}

fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide: '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

/// Charge l'historique depuis un CSV `;`-délimité (id;date;b1..b5;s1;s2),
/// ordonné du plus ancien au plus récent. Retourne les tirages avec le plus
/// récent en tête, comme attendu par le calcul des statistiques.
pub fn load_history(path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut result = ImportResult {
        draws: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => result.draws.push(draw),
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    result.draws.reverse();
    Ok(result)
}
