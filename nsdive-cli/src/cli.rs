//! CLI argument definitions

use std::path::PathBuf;

use clap::Parser;
use nsdive_core::KindSet;

#[derive(Parser)]
#[command(name = "nsdive")]
#[command(about = "Run a program in the namespaces of another process", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Target process to take namespaces from
    #[arg(short, long, value_name = "PID")]
    pub target: String,

    /// Enter the mount namespace
    #[arg(long)]
    pub mnt: bool,

    /// Enter the IPC namespace
    #[arg(long)]
    pub ipc: bool,

    /// Enter the network namespace
    #[arg(long)]
    pub net: bool,

    /// Enter the PID namespace
    #[arg(long)]
    pub pid: bool,

    /// Enter the user namespace
    #[arg(long)]
    pub user: bool,

    /// Enter the UTS namespace
    #[arg(long)]
    pub uts: bool,

    /// Enter all six namespace kinds
    #[arg(long)]
    pub all: bool,

    /// Procfs root to resolve namespaces under
    #[arg(long, default_value = "/proc", value_name = "PATH")]
    pub proc: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run inside the namespaces (default: /bin/sh)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// The requested namespace kinds
    pub fn kinds(&self) -> KindSet {
        if self.all {
            return KindSet::all();
        }

        KindSet::new()
            .with_mount(self.mnt)
            .with_ipc(self.ipc)
            .with_net(self.net)
            .with_pid(self.pid)
            .with_user(self.user)
            .with_uts(self.uts)
    }
}
