use clap::Parser;
use promptbuddy::cli::{
    handle_add, handle_category_add, handle_category_delete, handle_category_list, handle_delete,
    handle_duplicate, handle_favorite, handle_favorites, handle_get, handle_init, handle_list,
    handle_most_used, handle_reset_usage, handle_search, handle_update, handle_use,
    CategoryAction, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { backend } => handle_init(backend),
        Commands::Add {
            name,
            category,
            content,
            stdin,
            favorite,
            json,
        } => handle_add(name, category, content, stdin, favorite, json),
        Commands::List {
            search,
            category,
            sort,
            json,
        } => handle_list(search, category, sort, json),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Use { id } => handle_use(id),
        Commands::Update {
            id,
            name,
            category,
            content,
            stdin,
            json,
        } => handle_update(id, name, category, content, stdin, json),
        Commands::Delete { id, force } => handle_delete(id, force),
        Commands::Duplicate { id, json } => handle_duplicate(id, json),
        Commands::Favorite { id } => handle_favorite(id),
        Commands::Favorites { json } => handle_favorites(json),
        Commands::MostUsed { json } => handle_most_used(json),
        Commands::ResetUsage => handle_reset_usage(),
        Commands::Search { query, json } => handle_search(query, json),
        Commands::Category(category_cmd) => match category_cmd.action {
            CategoryAction::Add { name } => handle_category_add(name),
            CategoryAction::List { json } => handle_category_list(json),
            CategoryAction::Delete { name, force } => handle_category_delete(name, force),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
