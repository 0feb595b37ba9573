use sfnt_glyphs::{ImportOptions, import_font_file};

fn main() {
    env_logger::init();

    let mut args = std::env::args();
    let Some(infile) = args.nth(1) else {
        eprintln!("usage: sfnt-glyphs <font-file>");
        std::process::exit(2);
    };

    println!("Reading from {infile}");
    let options = ImportOptions::default().with_checksum_verification(true);
    let font = match import_font_file(&infile, &options) {
        Ok(font) => font,
        Err(err) => {
            eprintln!("{infile}: {err}");
            std::process::exit(1);
        }
    };

    let composites = font.glyphs.iter().filter(|g| g.is_composite()).count();
    let segments: usize = font
        .outlines
        .iter()
        .flat_map(|outline| &outline.contours)
        .map(|contour| contour.len())
        .sum();

    println!("{} ({:?}, {} units/em)", font.font_name, font.format, font.units_per_em);
    println!(
        "{} glyphs ({composites} composite), {segments} quadratic segments",
        font.num_glyphs()
    );
    println!(
        "cmap: platform {} encoding {} format {}, {} codes",
        font.character_map.platform_id,
        font.character_map.encoding_id,
        font.character_map.format,
        font.character_map.len()
    );
    for failure in &font.failures {
        println!("warning: {failure}");
    }
}
