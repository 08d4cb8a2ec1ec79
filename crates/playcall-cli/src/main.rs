mod command;
mod loader;
mod output;

fn main() -> anyhow::Result<()> {
    command::run()
}
