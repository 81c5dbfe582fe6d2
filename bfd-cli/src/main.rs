use bfd_cli::{decode_exit_code, log_level, run_decode, run_encode, Cli, Commands, EncodeOptions};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Decode {
            packets,
            file,
            source,
            params,
        } => {
            let outcome = run_decode(&packets, file.as_deref(), source, &params);
            if let Err(e) = &outcome {
                error!("{}", e);
            }
            decode_exit_code(&outcome)
        }
        Commands::Encode {
            my_disc,
            your_disc,
            state,
            diag,
            detect_mult,
            tx,
            rx,
            echo_rx,
            poll,
            final_bit,
        } => {
            let opts = EncodeOptions {
                my_disc,
                your_disc,
                state,
                diag,
                detect_mult,
                tx,
                rx,
                echo_rx,
                poll,
                final_bit,
            };
            println!("{}", run_encode(&opts));
            ExitCode::SUCCESS
        }
    }
}
