use dense_tiler::{
    ArraySchema, Attribute, AttributeBuffers, DenseTiler, Dimension, Domain, Layout, Subarray, TilerConfig,
    TilerError,
};

use rand::Rng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FILL: i32 = -1;

/// ----------------------
/// Print one tile as a grid, in the array's cell order
/// ----------------------
fn print_tile(values: &[i32], extents: &[u64], cell_order: Layout) {
    let (rows, cols) = (extents[0] as usize, extents[1] as usize);
    for r in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|c| {
                let idx = match cell_order {
                    Layout::RowMajor => r * cols + c,
                    Layout::ColMajor => c * rows + r,
                };
                match values[idx] {
                    FILL => "  .".to_string(),
                    v => format!("{v:3}"),
                }
            })
            .collect();
        println!("    {}", line.join(" "));
    }
}

/// ----------------------
/// Example Usage
/// ----------------------
fn main() -> Result<(), TilerError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 10 x 30 array in 5 x 10 tiles
    let domain = Domain::new(
        vec![
            Dimension::new("rows", [1i64, 10], 5),
            Dimension::new("cols", [1i64, 30], 10),
        ],
        Layout::RowMajor,
        Layout::RowMajor,
    );
    let schema = ArraySchema::new(domain).with_attribute(Attribute::typed("a", 1, FILL));

    // 3 x 5 block straddling four tiles, written column by column
    let subarray = Subarray::new(vec![[4, 6], [8, 12]], Layout::ColMajor);

    let mut rng = rand::rng();
    let data: Vec<i32> = (0..subarray.cell_num()).map(|_| rng.random_range(0..1000)).collect();

    let mut buffers = AttributeBuffers::new();
    buffers.insert_typed("a", &data);

    let tiler = DenseTiler::with_config(&schema, &subarray, buffers, TilerConfig::from_env())?;
    tracing::info!(
        domain = %schema.domain(),
        tiles = tiler.tile_num(),
        "tiling dense write"
    );

    let extents = schema.domain().tile_extents();
    for id in tiler.tile_ids() {
        let tile = tiler.get_tile(id, "a")?;
        let plan = tiler.copy_plan(id)?;
        println!(
            "tile {id} {:?}: {} runs of {} cells",
            tiler.tile_subarray(id)?,
            plan.run_count(),
            plan.copy_len
        );
        print_tile(&tile.values::<i32>(), &extents, schema.domain().cell_order());
    }

    Ok(())
}
