fn main() -> anyhow::Result<()> {
    let command_line_interface = harspec::cli::CommandLineInterface::load();
    command_line_interface.run()
}
