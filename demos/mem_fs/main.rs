//! Seed an in-memory volume and print what a mounted host would see.

pub mod fs;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dokan_vfs::driver::MountFlags;
use dokan_vfs::mount::{self, MountOptions};
use dokan_vfs::vfs::Vfs;

use self::fs::MemFs;

#[derive(Parser)]
#[command(name = "memfs", about = "Seed an in-memory volume and print its tree")]
struct Args {
    /// Mount point to validate: a drive letter like "Q:\" or an
    /// existing empty directory.
    mount_point: Option<String>,

    /// TOML file with mount options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Present the volume as a removable drive.
    #[arg(long)]
    removable: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut options = match &args.config {
        Some(config) => {
            let text = match std::fs::read_to_string(config) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("cannot read {}: {err}", config.display());
                    return ExitCode::FAILURE;
                }
            };
            match MountOptions::from_toml(&text) {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("bad config: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => MountOptions::default(),
    };
    if args.removable {
        options.flags |= MountFlags::REMOVABLE;
    }

    if let Some(mount_point) = &args.mount_point {
        if let Err(err) = mount::check_mount_point(mount_point) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
        println!("mount point {mount_point} is usable");
    }

    let memfs = MemFs::new();
    memfs.create("/test.txt").expect("seed file");
    memfs.append_text("/test.txt", "This is a test file").expect("seed content");
    memfs.make_dir("/TestDir").expect("seed directory");
    memfs
        .append_text("/TestDir/subtest.txt", "This is a test file in a subfolder")
        .expect("seed nested file");

    println!("volume \"{}\" ({}):", options.volume_name, options.fs_name);
    print_tree(&memfs, "/", 1);
    ExitCode::SUCCESS
}

fn print_tree(fs: &dyn Vfs, dir: &str, depth: usize) {
    let entries = fs.listdirinfo(dir).expect("list seeded directory");
    for (name, info) in entries {
        let indent = "  ".repeat(depth);
        if info.is_dir() {
            println!("{indent}{name}/");
            let child =
                if dir.ends_with('/') { format!("{dir}{name}") } else { format!("{dir}/{name}") };
            print_tree(fs, &child, depth + 1);
        } else {
            println!("{indent}{name} ({} bytes)", info.size);
        }
    }
}
