use std::future::Future;

use table::Table;
use tokio::{select, signal};
mod table;

use crate::{
    config::Config,
    die,
    discovery::{catalog::StaticCatalog, ErrorKind},
    registry::{repository, ModelRegistryModel, ModelRegistryRepository, RegistryMode},
    warn, GetArgs, ListArgs, ListingFormat, LookupArgs,
};

const DEFAULT_NAMESPACE: &str = "default";

fn registry_table(registries: &[ModelRegistryModel]) -> Result<Table, table::Error> {
    let mut tab = Table::new();

    tab.set_header(vec!["NAME", "DISPLAY_NAME", "SERVER_ADDRESS", "TLS"])?;

    for registry in registries {
        tab.add_row(vec![
            registry.name.clone(),
            registry.display_name.clone(),
            registry.server_address.clone(),
            if registry.is_https {
                "yes".to_string()
            } else {
                "no".to_string()
            },
        ])?;
    }

    Ok(tab)
}

fn format_output<O: serde::Serialize>(
    object: &O,
    registries: &[ModelRegistryModel],
    format: ListingFormat,
) {
    match format {
        ListingFormat::Json => match serde_json::to_string_pretty(object) {
            Ok(output) => println!("{}", output),
            Err(err) => die!("failed to serialize output: {}", err),
        },
        ListingFormat::Table | ListingFormat::HeaderlessTable => {
            let mut tab = match registry_table(registries) {
                Ok(tab) => tab,
                Err(err) => die!("failed to build table: {}", err),
            };

            tab.print_header(matches!(format, ListingFormat::Table));

            print!("{}", tab);
        }
    }
}

fn namespace<'a>(config: &'a Config, args: &'a LookupArgs) -> &'a str {
    args.namespace
        .as_deref()
        .or(config.namespace.as_deref())
        .unwrap_or(DEFAULT_NAMESPACE)
}

fn mode(config: &Config, args: &LookupArgs) -> RegistryMode {
    RegistryMode::from_federated(args.federated || config.federated)
}

fn catalog(config: &Config) -> StaticCatalog {
    let catalog = match StaticCatalog::from_entries(&config.services) {
        Ok(catalog) => catalog,
        Err(err) => die!("invalid service catalog: {}", err),
    };

    if catalog.is_empty() {
        warn!("no model registry services are configured");
    }

    catalog
}

fn warn_on_unusable_addresses(registries: &[ModelRegistryModel]) {
    for registry in registries {
        if let Err(err) = registry.server_url() {
            warn!(
                "model registry \"{}\" has an unusable server address \"{}\": {}",
                registry.name, registry.server_address, err
            );
        }
    }
}

/// Describes a failed lookup. A missing registry is reported on its own,
/// other failures keep the collaborator's cause.
fn lookup_failure(err: &repository::Error) -> String {
    match err {
        repository::Error::LookupOne {
            namespace, name, ..
        } if err.kind() == ErrorKind::NotFound => {
            format!(
                "no model registry named \"{}\" in namespace \"{}\"",
                name, namespace
            )
        }
        _ => err.to_string(),
    }
}

/// Runs a lookup until it completes or the user interrupts it. Interrupting
/// drops the lookup along with any discovery call still in flight.
async fn interruptible<F: Future>(lookup: F) -> F::Output {
    select! {
        output = lookup => output,
        _ = signal::ctrl_c() => die!("interrupted"),
    }
}

pub(crate) async fn list_cmd(config: &Config, args: &ListArgs) {
    let catalog = catalog(config);
    let repository = ModelRegistryRepository::new();

    let registries = interruptible(repository.list(
        &catalog,
        namespace(config, &args.lookup),
        mode(config, &args.lookup),
    ))
    .await;

    let registries = match registries {
        Ok(registries) => registries,
        Err(err) => die!("{}", lookup_failure(&err)),
    };

    warn_on_unusable_addresses(&registries);

    format_output(&registries, &registries, args.lookup.format);
}

pub(crate) async fn get_cmd(config: &Config, args: &GetArgs) {
    let catalog = catalog(config);
    let repository = ModelRegistryRepository::new();

    let registry = interruptible(repository.get(
        &catalog,
        namespace(config, &args.lookup),
        &args.name,
        mode(config, &args.lookup),
    ))
    .await;

    let registry = match registry {
        Ok(registry) => registry,
        Err(err) => die!("{}", lookup_failure(&err)),
    };

    let registries = std::slice::from_ref(&registry);

    warn_on_unusable_addresses(registries);

    format_output(&registry, registries, args.lookup.format);
}
