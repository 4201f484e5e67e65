use anyhow::Result;
use clap::Parser;
use img_stamp::batch::batch_stamp_images;
use img_stamp::catalog::{stamp_asset_name, EmbeddedCatalog};
use img_stamp::cli::{Args, Commands, EventKind};
use img_stamp::constants::DEFAULT_STAMP_SIZE;
use img_stamp::dispatch::{process_event, ChangeEvent, Outcome};
use img_stamp::info::get_image_info;
use img_stamp::stamp::{stamp_file, StampOptions};
use img_stamp::store::FsStore;
use rayon::ThreadPoolBuilder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let catalog = EmbeddedCatalog::new();

    match args.command {
        Commands::Stamp {
            input,
            output,
            size,
            optimize,
            threads,
        } => {
            setup_thread_pool(threads);
            let options = StampOptions::new(optimize, size)?;
            stamp_file(input, output, &catalog, options)?;
        }
        Commands::Batch {
            input,
            output,
            size,
            optimize,
            threads,
            recursive,
        } => {
            setup_thread_pool(threads);
            let options = StampOptions::new(optimize, size)?;
            batch_stamp_images(input, output, options, recursive, &catalog)?;
        }
        Commands::Event {
            root,
            kind,
            key,
            optimize,
        } => {
            let options = StampOptions::new(optimize, None)?;
            let mut store = FsStore::new(root)?;
            let event = match kind {
                EventKind::Created => ChangeEvent::Created { key },
                EventKind::Removed => ChangeEvent::Removed { key },
            };
            let outcome = process_event(&mut store, &catalog, &options, &event)?;
            report_outcome(&outcome);
        }
        Commands::Info { input } => {
            get_image_info(&input, &catalog)?;
        }
        Commands::Assets => {
            list_assets(&catalog);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_thread_pool(threads: Option<usize>) {
    if let Some(num_threads) = threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to set thread pool size: {}", e);
            });
    }
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Stamped { output_key } => {
            println!("✅ Stamped object stored as {}", output_key);
        }
        Outcome::SkippedTransformed => {
            println!("⚠️  Object already transformed, skipped");
        }
        Outcome::Deleted { output_key } => {
            println!("✅ Deleted transformed object {}", output_key);
        }
        Outcome::Ignored => {
            println!("⚠️  Unsupported event, ignored");
        }
    }
}

fn list_assets(catalog: &EmbeddedCatalog) {
    println!("📋 Packaged stamp assets:");
    for &(size_tag, bytes) in catalog.entries() {
        let name = stamp_asset_name(size_tag);
        let marker = if size_tag == DEFAULT_STAMP_SIZE {
            " (default fallback)"
        } else {
            ""
        };
        println!(
            "  🏷️  {}: {}x{} px, {} bytes{}",
            name,
            size_tag,
            size_tag,
            bytes.len(),
            marker
        );
    }
}
