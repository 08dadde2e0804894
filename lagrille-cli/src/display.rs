use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lagrille_engine::{Category, Grille, SelectionResult};
use lagrille_stats::models::{Pool, ValueStat};
use lagrille_stats::windows::WindowConfig;

fn category_color(category: Category) -> Color {
    match category {
        Category::Dormeur => Color::Cyan,
        Category::Haute => Color::Green,
        Category::Tendance => Color::Yellow,
        Category::Surrepresentation => Color::Magenta,
        Category::Complement => Color::White,
    }
}

pub fn display_stats(balls: &[ValueStat], stars: &[ValueStat], windows: &WindowConfig) {
    println!(
        "\n📊 Statistiques (fenêtres : haute {}, tendance {}, dormeur {}, surrepr {})\n",
        windows.haute, windows.tendance, windows.dormeur, windows.surrepr
    );

    println!("── Boules (1-50) ──");
    display_stat_table(balls);

    println!("\n── Étoiles (1-12) ──");
    display_stat_table(stars);
}

fn display_stat_table(stats: &[ValueStat]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Tendance", "Retard", "Z-score"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.value.cmp(&b.value)));

    for stat in &sorted {
        let z_color = if stat.surrepr_z >= 2.0 {
            Color::Green
        } else if stat.surrepr_z <= -2.0 {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.value)),
            Cell::new(stat.frequency.to_string()),
            Cell::new(format!("{} {}", stat.trend_score, stat.trend_direction)),
            Cell::new(stat.absence.to_string()),
            Cell::new(format!("{:+.2}", stat.surrepr_z)).fg(z_color),
        ]);
    }
    println!("{table}");
}

pub fn display_grille(grille: &Grille) {
    println!("\n🎲 Grille générée\n");

    println!("── Boules ──");
    display_selection(&grille.balls, Pool::Balls);

    println!("\n── Étoiles ──");
    display_selection(&grille.stars, Pool::Stars);

    match grille.price() {
        Some(price) => println!("\nTarif : {:.2} €", price),
        None => println!("\nCombinaison hors table des tarifs"),
    }
}

fn display_selection(selection: &SelectionResult, pool: Pool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            match pool {
                Pool::Balls => "Boule",
                Pool::Stars => "Étoile",
            },
            "Origine",
        ]);

    for &value in &selection.values {
        let category = selection.source_of.get(&value).copied();
        let label = category.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string());
        let color = category.map(category_color).unwrap_or(Color::White);
        table.add_row(vec![
            Cell::new(format!("{:2}", value)),
            Cell::new(label).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(total_records: u32, loaded: usize, errors: u32) {
    println!("Historique chargé :");
    println!("  Lignes lues : {}", total_records);
    println!("  Tirages     : {}", loaded);
    if errors > 0 {
        println!("  Erreurs     : {}", errors);
    }
}
