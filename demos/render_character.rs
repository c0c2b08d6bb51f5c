use std::sync::Arc;

use bpl::{
    CharacterToken, LibraryParams, Point, Relation, RelationCategory, Spline,
};
use rand::SeedableRng;

fn arc_shape(dx: f64, dy: f64, bend: f64) -> anyhow::Result<Spline> {
    let cpts = (0..5)
        .map(|i| {
            let t = f64::from(i) / 4.0;
            Point::new(dx * t + bend * t * (1.0 - t), dy * t)
        })
        .collect();
    Ok(Spline::new(cpts)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "target/render_character.png".to_string());
    let lib = match std::env::var("BPL_PARAMS") {
        Ok(path) => LibraryParams::from_json_path(path)?,
        Err(_) => LibraryParams::default(),
    };
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);

    let mut c = CharacterToken::new(1e-3, 1.0, None)?;

    let first = Arc::new(Relation::independent(
        Point::new(35.0, -25.0),
        lib.render.imsize,
        &lib.rel,
    )?);
    c.push_stroke(
        first.sample_token(&mut rng)?,
        vec![arc_shape(0.0, -40.0, 12.0)?],
        vec![1.0],
        lib.neval,
        &mut rng,
    )?;

    let end = Arc::new(Relation::attach(RelationCategory::End, 0, &lib.rel)?);
    c.push_stroke(
        end.sample_token(&mut rng)?,
        vec![arc_shape(25.0, 0.0, -6.0)?, arc_shape(0.0, 20.0, 4.0)?],
        vec![1.0, 1.0],
        lib.neval,
        &mut rng,
    )?;

    let mid = Arc::new(Relation::attach_along(0, 0, 3.5, &lib)?);
    c.push_stroke(
        mid.sample_token(&mut rng)?,
        vec![arc_shape(18.0, 2.0, 0.0)?],
        vec![1.0],
        lib.neval,
        &mut rng,
    )?;

    let pimg = c.render(&lib.render)?;
    if pimg.ink_off_page() {
        tracing::warn!("part of the character fell off the page");
    }
    if let Some(parent) = std::path::Path::new(&out_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    pimg.to_gray_image().save(&out_path)?;
    println!(
        "wrote {out_path} (location log-prob {:.3})",
        c.score_locations()?
    );
    Ok(())
}
