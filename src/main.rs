use breadboard::cmd::{Cli, Commands};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Show(args) => args.run(),
        Commands::Table(args) => args.run(),
        Commands::Expression(args) => args.run(),
        Commands::Simulate(args) => args.run(),
    }
}
