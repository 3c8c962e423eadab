use clap::Parser;
use tripdesk::cli::{
    assign, handle_completions, handle_config_init, roster, rules, sequence, Cli, Commands,
    ConfigCommands, QueriesCommands, RulesCommands, SequenceCommands, StaffCommands,
};
use tripdesk::service::SequenceOp;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recommend(args) => assign::handle_recommend(&args).await,
        Commands::Assign(args) => assign::handle_assign(&args).await,
        Commands::AutoAssign(args) => assign::handle_auto_assign(&args).await,
        Commands::Start(args) => assign::handle_start(&args).await,
        Commands::Complete(args) => assign::handle_complete(&args).await,
        Commands::Staff(StaffCommands::List(args)) => roster::handle_staff_list(&args).await,
        Commands::Queries(QueriesCommands::List(args)) => {
            roster::handle_queries_list(&args).await
        }
        Commands::Rules(cmd) => match cmd {
            RulesCommands::List(args) => rules::handle_rules_list(&args).await,
            RulesCommands::Enable(args) => rules::handle_rules_toggle(&args, true).await,
            RulesCommands::Disable(args) => rules::handle_rules_toggle(&args, false).await,
        },
        Commands::Sequence(cmd) => match cmd {
            SequenceCommands::Show(args) => sequence::handle_sequence_show(&args).await,
            SequenceCommands::Add(args) => {
                sequence::handle_sequence_edit(&args, SequenceOp::Add).await
            }
            SequenceCommands::Remove(args) => {
                sequence::handle_sequence_edit(&args, SequenceOp::Remove).await
            }
            SequenceCommands::Up(args) => {
                sequence::handle_sequence_edit(&args, SequenceOp::MoveUp).await
            }
            SequenceCommands::Down(args) => {
                sequence::handle_sequence_edit(&args, SequenceOp::MoveDown).await
            }
        },
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(&args),
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
