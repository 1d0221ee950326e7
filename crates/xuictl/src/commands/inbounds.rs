//! Inbound command handlers.

use tabled::Tabled;

use xuictl_api::model::WireModel;
use xuictl_api::{Api, Inbound};

use crate::cli::{GlobalOpts, InboundsArgs, InboundsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InboundRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Remark")]
    remark: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Enabled")]
    enable: bool,
    #[tabled(rename = "Clients")]
    clients: usize,
    #[tabled(rename = "Up/Down")]
    traffic: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl From<&Inbound> for InboundRow {
    fn from(i: &Inbound) -> Self {
        Self {
            id: i.id,
            remark: i.remark.clone(),
            protocol: i.protocol.clone(),
            port: i.port,
            network: transport_label(i),
            enable: i.enable,
            clients: i.settings.clients.len(),
            traffic: format!("{}/{}", output::fmt_bytes(i.up), output::fmt_bytes(i.down)),
            expiry: output::fmt_expiry(i.expiry_time),
        }
    }
}

fn transport_label(i: &Inbound) -> String {
    let s = &i.stream_settings;
    match (s.network.as_str(), s.security.as_str()) {
        ("", _) => "-".into(),
        (net, "" | "none") => net.into(),
        (net, sec) => format!("{net}+{sec}"),
    }
}

fn detail(i: &Inbound) -> String {
    let mut lines = vec![
        format!("ID:        {}", i.id),
        format!("Remark:    {}", if i.remark.is_empty() { "-" } else { i.remark.as_str() }),
        format!("Enabled:   {}", i.enable),
        format!("Protocol:  {}", i.protocol),
        format!(
            "Listen:    {}:{}",
            if i.listen.is_empty() { "*" } else { i.listen.as_str() },
            i.port
        ),
        format!("Transport: {}", transport_label(i)),
        format!("Tag:       {}", if i.tag.is_empty() { "-" } else { i.tag.as_str() }),
        format!("Upload:    {}", output::fmt_bytes(i.up)),
        format!("Download:  {}", output::fmt_bytes(i.down)),
        format!("Quota:     {}", output::fmt_quota(i.total)),
        format!("Expiry:    {}", output::fmt_expiry(i.expiry_time)),
        format!("Sniffing:  {}", i.sniffing.enabled),
    ];
    if !i.settings.clients.is_empty() {
        lines.push(format!("Clients:   {}", i.settings.clients.len()));
        for c in &i.settings.clients {
            let state = if c.enable { "" } else { " (disabled)" };
            lines.push(format!("  - {} [{}]{state}", c.email, c.id));
        }
    }
    lines.join("\n")
}

fn not_found(id: i64) -> CliError {
    CliError::NotFound {
        resource_type: "inbound".into(),
        identifier: id.to_string(),
        list_command: "inbounds list".into(),
    }
}

fn load_inbound(path: &std::path::Path) -> Result<Inbound, CliError> {
    let value = util::read_json_file(path)?;
    Inbound::from_wire(value).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("not a valid inbound: {e}"),
    })
}

async fn set_enabled(api: &Api, id: i64, enable: bool) -> Result<(), CliError> {
    let mut inbound = api.inbound.get_by_id(id).await?.ok_or_else(|| not_found(id))?;
    inbound.enable = enable;
    api.inbound.update(id, &inbound).await?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(api: &Api, args: InboundsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InboundsCommand::List => {
            let inbounds = api.inbound.get_list().await?;
            let out = output::render_list(
                &global.output,
                &inbounds,
                |i| InboundRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InboundsCommand::Get { id } => {
            let inbound = api.inbound.get_by_id(id).await?.ok_or_else(|| not_found(id))?;
            let out = output::render_single(&global.output, &inbound, detail, |i| i.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InboundsCommand::Add { from_file } => {
            let inbound = load_inbound(&from_file)?;
            api.inbound.add(&inbound).await?;
            output::print_status(
                &format!("Inbound added on port {} ({})", inbound.port, inbound.protocol),
                global.quiet,
            );
            Ok(())
        }

        InboundsCommand::Update { id, from_file } => {
            let inbound = load_inbound(&from_file)?;
            api.inbound.update(id, &inbound).await?;
            output::print_status(&format!("Inbound {id} updated"), global.quiet);
            Ok(())
        }

        InboundsCommand::Enable { id } => {
            set_enabled(api, id, true).await?;
            output::print_status(&format!("Inbound {id} enabled"), global.quiet);
            Ok(())
        }

        InboundsCommand::Disable { id } => {
            set_enabled(api, id, false).await?;
            output::print_status(&format!("Inbound {id} disabled"), global.quiet);
            Ok(())
        }

        InboundsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete inbound {id} and all of its clients?"),
                global.yes,
            )? {
                return Ok(());
            }
            api.inbound.delete(id).await?;
            output::print_status(&format!("Inbound {id} deleted"), global.quiet);
            Ok(())
        }

        InboundsCommand::ResetTraffic => {
            if !util::confirm("Reset traffic counters of every inbound?", global.yes)? {
                return Ok(());
            }
            api.inbound.reset_stats().await?;
            output::print_status("Inbound traffic reset", global.quiet);
            Ok(())
        }

        InboundsCommand::ResetClientTraffic { id } => {
            if !util::confirm(
                &format!("Reset traffic counters of every client on inbound {id}?"),
                global.yes,
            )? {
                return Ok(());
            }
            api.inbound.reset_client_stats(id).await?;
            output::print_status(&format!("Client traffic reset on inbound {id}"), global.quiet);
            Ok(())
        }
    }
}
