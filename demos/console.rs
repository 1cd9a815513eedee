use anyhow::{bail, Result};
use pipelines_client::{
    api::{
        client::ResourceFilter,
        contributor::{NewContributor, Permission},
        experiment::Experiment,
        filter::Filter,
        list::{ListOptions, SortBy},
    },
    pagination::experiment_pages,
    Configuration, ContributorService, ExperimentId, ExperimentService, Server,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: console <command> [options]

commands:
  list                 [--page-size N] [--sort FIELD[ asc|desc]] [--name-contains TEXT] [--namespace NS] [--all]
  get                  --id ID
  create               --name NAME [--description TEXT] [--namespace NS]
  delete               --id ID
  contributors         --namespace NS
  add-contributor      --namespace NS --user USER [--permission view|edit]
  remove-contributor   --namespace NS --user USER [--permission view|edit]

The server is read from PIPELINES_API_URL, the token from PIPELINES_TOKEN.";

fn print_experiment(experiment: &Experiment) {
    let id = experiment.id.as_ref().map(|id| id.as_ref()).unwrap_or("-");
    let created = experiment
        .created_at
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| "-".to_owned());
    println!("{:<38} {:<30} {}", id, experiment.name, created);
}

fn list(server: &Server, mut args: pico_args::Arguments) -> Result<()> {
    let mut options = ListOptions::new();
    if let Some(size) = args.opt_value_from_str(["-p", "--page-size"])? {
        options = options.page_size(size);
    }
    if let Some(sort) = args.opt_value_from_str::<_, SortBy>(["-s", "--sort"])? {
        options = options.sort_by(sort);
    }
    if let Some(text) = args.opt_value_from_str::<_, String>("--name-contains")? {
        options = options.filter(&Filter::new().contains("name", text));
    }
    let namespace: Option<String> = args.opt_value_from_str(["-n", "--namespace"])?;
    let all = args.contains(["-a", "--all"]);
    args.finish()?;

    let resource = namespace.map(ResourceFilter::namespace);
    if all {
        let experiments = experiment_pages(server, options, resource.as_ref()).collect_items()?;
        experiments.iter().for_each(print_experiment);
        println!("{} experiments", experiments.len());
    } else {
        let page = server.list_experiments(&options, resource.as_ref())?;
        page.items.iter().for_each(print_experiment);
        println!("{} of {} experiments", page.items.len(), page.total_size);
        if !page.is_last_page() {
            println!("next page token: {}", page.next_page_token);
        }
    }
    Ok(())
}

fn contributor(mut args: pico_args::Arguments) -> Result<pipelines_client::api::contributor::Binding> {
    let namespace: String = args.value_from_str(["-n", "--namespace"])?;
    let user: String = args.value_from_str(["-u", "--user"])?;
    let permission: Permission = args
        .opt_value_from_str(["-r", "--permission"])?
        .unwrap_or_default();
    args.finish()?;
    Ok(NewContributor::new(namespace).user(user).permission(permission).build()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("{}", USAGE);
        return Ok(());
    }
    let command = args.subcommand()?;
    let server = Server::new(Configuration::from_env());

    match command.as_deref() {
        Some("list") => list(&server, args)?,
        Some("get") => {
            let id: String = args.value_from_str(["-i", "--id"])?;
            args.finish()?;
            let experiment = server.get_experiment(&ExperimentId::from(id))?;
            print_experiment(&experiment);
            if let Some(description) = &experiment.description {
                println!("{}", description);
            }
        }
        Some("create") => {
            let name: String = args.value_from_str("--name")?;
            let description: Option<String> = args.opt_value_from_str(["-d", "--description"])?;
            let namespace: Option<String> = args.opt_value_from_str(["-n", "--namespace"])?;
            args.finish()?;
            let mut experiment = Experiment::new(name);
            if let Some(description) = description {
                experiment = experiment.with_description(description);
            }
            if let Some(namespace) = namespace {
                experiment = experiment.in_namespace(namespace);
            }
            let created = server.create_experiment(&experiment)?;
            println!("Experiment {} was created successfully!", created.name);
            print_experiment(&created);
        }
        Some("delete") => {
            let id: String = args.value_from_str(["-i", "--id"])?;
            args.finish()?;
            server.delete_experiment(&ExperimentId::from(id.as_str()))?;
            println!("Experiment {} was deleted.", id);
        }
        Some("contributors") => {
            let namespace: String = args.value_from_str(["-n", "--namespace"])?;
            args.finish()?;
            let contributors = server.list_contributors(&namespace)?;
            if contributors.is_empty() {
                println!("No contributors found.");
            }
            for binding in contributors {
                println!("{:<40} {}", binding.user.name, binding.role_ref.name);
            }
        }
        Some("add-contributor") => {
            let binding = contributor(args)?;
            server.add_contributor(&binding)?;
            println!("Successfully added new contributor: {}", binding.user.name);
        }
        Some("remove-contributor") => {
            let binding = contributor(args)?;
            server.remove_contributor(&binding)?;
            println!("Removed contributor {}", binding.user.name);
        }
        Some(other) => bail!("unknown command {:?}\n\n{}", other, USAGE),
        None => println!("{}", USAGE),
    }

    Ok(())
}
