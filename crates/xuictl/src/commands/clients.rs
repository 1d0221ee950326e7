//! Client command handlers.

use serde::Serialize;
use tabled::Tabled;

use xuictl_api::{Api, Client, Inbound};

use crate::cli::{ClientAddArgs, ClientUpdateArgs, ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

/// A settings entry joined with its traffic row.
#[derive(Debug, Serialize)]
struct ClientView {
    inbound_id: i64,
    email: String,
    id: String,
    enable: bool,
    up: i64,
    down: i64,
    total_gb: i64,
    expiry_time: i64,
}

fn collect_views(inbounds: &[Inbound], only: Option<i64>) -> Vec<ClientView> {
    inbounds
        .iter()
        .filter(|ib| only.is_none_or(|id| ib.id == id))
        .flat_map(|ib| {
            ib.settings.clients.iter().map(move |c| {
                let stats = ib.client_stats.iter().find(|s| s.email == c.email);
                ClientView {
                    inbound_id: ib.id,
                    email: c.email.clone(),
                    id: c.id.to_string(),
                    enable: c.enable,
                    up: stats.map_or(0, |s| s.up),
                    down: stats.map_or(0, |s| s.down),
                    total_gb: c.total_gb,
                    expiry_time: c.expiry_time,
                }
            })
        })
        .collect()
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Inbound")]
    inbound: i64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Enabled")]
    enable: bool,
    #[tabled(rename = "Up")]
    up: String,
    #[tabled(rename = "Down")]
    down: String,
    #[tabled(rename = "Quota")]
    quota: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl From<&ClientView> for ClientRow {
    fn from(v: &ClientView) -> Self {
        Self {
            inbound: v.inbound_id,
            email: v.email.clone(),
            id: v.id.clone(),
            enable: v.enable,
            up: output::fmt_bytes(v.up),
            down: output::fmt_bytes(v.down),
            quota: output::fmt_quota(v.total_gb),
            expiry: output::fmt_expiry(v.expiry_time),
        }
    }
}

#[derive(Tabled)]
struct TrafficRow {
    #[tabled(rename = "Inbound")]
    inbound: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Enabled")]
    enable: bool,
    #[tabled(rename = "Up")]
    up: String,
    #[tabled(rename = "Down")]
    down: String,
    #[tabled(rename = "Quota")]
    quota: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl From<&Client> for TrafficRow {
    fn from(c: &Client) -> Self {
        Self {
            inbound: c.inbound_id.map_or_else(|| "-".into(), |id| id.to_string()),
            email: c.email.clone(),
            enable: c.enable,
            up: output::fmt_bytes(c.up),
            down: output::fmt_bytes(c.down),
            quota: output::fmt_quota(c.total),
            expiry: output::fmt_expiry(c.expiry_time),
        }
    }
}

#[derive(Tabled)]
struct OnlineRow {
    #[tabled(rename = "Email")]
    email: String,
}

fn traffic_detail(c: &Client) -> String {
    [
        format!("Email:     {}", c.email),
        format!(
            "Inbound:   {}",
            c.inbound_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Enabled:   {}", c.enable),
        format!("Upload:    {}", output::fmt_bytes(c.up)),
        format!("Download:  {}", output::fmt_bytes(c.down)),
        format!("Quota:     {}", output::fmt_quota(c.total)),
        format!("Expiry:    {}", output::fmt_expiry(c.expiry_time)),
    ]
    .join("\n")
}

fn not_found(resource_type: &str, identifier: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: "clients list".into(),
    }
}

// ── Add / update ────────────────────────────────────────────────────

fn build_client(args: &ClientAddArgs) -> Result<Client, CliError> {
    let id = args
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let mut client = Client::new(&args.email, !args.disabled).with_id(id);
    client.total_gb = util::gib_to_bytes(args.total_gb)?;
    client.expiry_time = args.expiry_days.map_or(0, util::expiry_from_days);
    client.limit_ip = args.limit_ip;
    if let Some(flow) = &args.flow {
        client.flow.clone_from(flow);
    }
    if let Some(tg_id) = &args.tg_id {
        client.tg_id = util::parse_tg_id(tg_id);
    }
    if let Some(sub_id) = &args.sub_id {
        client.sub_id.clone_from(sub_id);
    }
    Ok(client)
}

fn apply_update(client: &mut Client, args: &ClientUpdateArgs) -> Result<(), CliError> {
    if args.enable {
        client.enable = true;
    }
    if args.disable {
        client.enable = false;
    }
    if let Some(email) = &args.email {
        client.email.clone_from(email);
    }
    if let Some(gb) = args.total_gb {
        client.total_gb = util::gib_to_bytes(gb)?;
    }
    if let Some(days) = args.expiry_days {
        client.expiry_time = util::expiry_from_days(days);
    }
    if let Some(limit) = args.limit_ip {
        client.limit_ip = limit;
    }
    client.inbound_id = Some(args.inbound);
    Ok(())
}

async fn update_client(api: &Api, args: &ClientUpdateArgs) -> Result<(), CliError> {
    let inbound = api
        .inbound
        .get_by_id(args.inbound)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "inbound".into(),
            identifier: args.inbound.to_string(),
            list_command: "inbounds list".into(),
        })?;
    let mut client = inbound
        .settings
        .clients
        .into_iter()
        .find(|c| c.id.to_string() == args.uuid)
        .ok_or_else(|| not_found("client", &args.uuid))?;
    apply_update(&mut client, args)?;
    api.client.update(&args.uuid, &client).await?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(api: &Api, args: ClientsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List { inbound } => {
            let inbounds = api.inbound.get_list().await?;
            let views = collect_views(&inbounds, inbound);
            let out = output::render_list(
                &global.output,
                &views,
                |v| ClientRow::from(v),
                |v| v.email.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get { email } => {
            let client = api
                .client
                .get_by_email(&email)
                .await?
                .ok_or_else(|| not_found("client", &email))?;
            let out = output::render_single(&global.output, &client, traffic_detail, |c| {
                c.email.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Traffic { uuid } => {
            let rows = api.client.get_traffic_by_id(&uuid).await?;
            let out = output::render_list(
                &global.output,
                &rows,
                |c| TrafficRow::from(c),
                |c| c.email.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Ips { email } => {
            match api.client.get_ips(&email).await? {
                Some(ips) => output::print_output(&ips, global.quiet),
                None => output::print_status(&format!("No IP record for {email}"), global.quiet),
            }
            Ok(())
        }

        ClientsCommand::Add(add) => {
            let client = build_client(&add)?;
            api.client.add(add.inbound, std::slice::from_ref(&client)).await?;
            output::print_status(
                &format!("Client {} added to inbound {}", client.email, add.inbound),
                global.quiet,
            );
            output::print_output(&client.id.to_string(), global.quiet);
            Ok(())
        }

        ClientsCommand::Update(update) => {
            update_client(api, &update).await?;
            output::print_status(&format!("Client {} updated", update.uuid), global.quiet);
            Ok(())
        }

        ClientsCommand::ResetIps { email } => {
            api.client.reset_ips(&email).await?;
            output::print_status(&format!("IP record cleared for {email}"), global.quiet);
            Ok(())
        }

        ClientsCommand::ResetTraffic { inbound, email } => {
            api.client.reset_stats(inbound, &email).await?;
            output::print_status(&format!("Traffic reset for {email}"), global.quiet);
            Ok(())
        }

        ClientsCommand::Delete { inbound, uuid } => {
            if !util::confirm(
                &format!("Delete client {uuid} from inbound {inbound}?"),
                global.yes,
            )? {
                return Ok(());
            }
            api.client.delete(inbound, &uuid).await?;
            output::print_status(&format!("Client {uuid} deleted"), global.quiet);
            Ok(())
        }

        ClientsCommand::DeleteDepleted { inbound } => {
            if !util::confirm(
                &format!("Delete every depleted client on inbound {inbound}?"),
                global.yes,
            )? {
                return Ok(());
            }
            api.client.delete_depleted(inbound).await?;
            output::print_status(
                &format!("Depleted clients removed from inbound {inbound}"),
                global.quiet,
            );
            Ok(())
        }

        ClientsCommand::Online => {
            let emails = api.client.online().await?;
            let out = output::render_list(
                &global.output,
                &emails,
                |e| OnlineRow { email: e.clone() },
                String::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use xuictl_api::{FlexibleId, Settings, Sniffing, StreamSettings};

    use super::*;

    fn inbound(id: i64, emails: &[&str]) -> Inbound {
        let clients = emails
            .iter()
            .map(|e| Client::new(*e, true).with_id(format!("uuid-{e}")))
            .collect();
        let mut ib = Inbound::new(
            443,
            "vless",
            Settings::with_clients(clients),
            StreamSettings::new("tcp", "none"),
            Sniffing::new(false),
        );
        ib.id = id;
        ib
    }

    #[test]
    fn views_join_traffic_by_email() {
        let mut ib = inbound(1, &["a@x", "b@x"]);
        let mut stats = Client::new("b@x", true).with_inbound_id(1);
        stats.up = 10;
        stats.down = 20;
        ib.client_stats = vec![stats];

        let views = collect_views(&[ib, inbound(2, &["c@x"])], None);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].up, 0);
        assert_eq!(views[1].email, "b@x");
        assert_eq!(views[1].down, 20);
        assert_eq!(views[2].inbound_id, 2);
    }

    #[test]
    fn views_filter_by_inbound() {
        let views = collect_views(&[inbound(1, &["a@x"]), inbound(2, &["c@x"])], Some(2));
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, "uuid-c@x");
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut client = Client::new("a@x", true).with_id("uuid-a");
        client.limit_ip = 2;
        let args = ClientUpdateArgs {
            inbound: 7,
            uuid: "uuid-a".into(),
            enable: false,
            disable: true,
            email: None,
            total_gb: Some(1),
            expiry_days: None,
            limit_ip: None,
        };
        apply_update(&mut client, &args).unwrap();
        assert!(!client.enable);
        assert_eq!(client.email, "a@x");
        assert_eq!(client.limit_ip, 2);
        assert_eq!(client.total_gb, 1_073_741_824);
        assert_eq!(client.inbound_id, Some(7));
        assert_eq!(client.id, FlexibleId::Text("uuid-a".into()));
    }
}
