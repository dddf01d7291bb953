use std::io;

use clap_complete::Shell;

#[derive(Clone, Debug, clap::Parser)]
pub struct CompletionsCommand {
    shell: Shell,
}

impl CompletionsCommand {
    pub fn exec<T: clap::CommandFactory>(self) -> anyhow::Result<()> {
        clap_complete::generate(
            self.shell,
            &mut T::command(),
            env!("CARGO_BIN_NAME"),
            &mut io::stdout().lock(),
        );
        Ok(())
    }
}
