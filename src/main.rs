use realtype::{cli, logging};

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init(command_line_interface.log_settings());
    command_line_interface.run()
}
