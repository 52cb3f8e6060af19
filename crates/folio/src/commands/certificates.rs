//! Certificate command handlers.

use serde::Deserialize;
use tabled::Tabled;

use folio_config::Config;
use folio_core::{Certificate, CertificateForm, ListParams, Portfolio};

use crate::cli::{CertificateInputArgs, CertificatesArgs, CertificatesCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CertificateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Issuer")]
    issuer: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Credential")]
    credential: String,
}

impl From<&Certificate> for CertificateRow {
    fn from(c: &Certificate) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            issuer: c.issuer.clone(),
            issued: c.date_issued.clone(),
            credential: c.credential_id.clone().unwrap_or_default(),
        }
    }
}

fn detail(c: &Certificate) -> String {
    [
        format!("ID:          {}", c.id),
        format!("Title:       {}", c.title),
        format!("Issuer:      {}", c.issuer),
        format!("Issued:      {}", c.date_issued),
        format!("Credential:  {}", util::or_dash(c.credential_id.as_deref())),
        format!("Image:       {}", util::or_dash(c.image_url.as_deref())),
    ]
    .join("\n")
}

// ── Form assembly ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CertificateFile {
    title: Option<String>,
    issuer: Option<String>,
    date_issued: Option<String>,
    credential_id: Option<String>,
    image_url: Option<String>,
}

fn build_form(
    mut form: CertificateForm,
    args: &CertificateInputArgs,
) -> Result<CertificateForm, CliError> {
    if let Some(ref path) = args.from_file {
        let file: CertificateFile = serde_json::from_value(util::read_json_file(path)?)?;
        let layers = [
            (&mut form.title, file.title),
            (&mut form.issuer, file.issuer),
            (&mut form.date_issued, file.date_issued),
            (&mut form.credential_id, file.credential_id),
            (&mut form.image_url, file.image_url),
        ];
        for (slot, value) in layers {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    let flags = [
        (&mut form.title, &args.title),
        (&mut form.issuer, &args.issuer),
        (&mut form.date_issued, &args.date_issued),
        (&mut form.credential_id, &args.credential_id),
    ];
    for (slot, value) in flags {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }

    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    portfolio: &Portfolio,
    args: CertificatesArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CertificatesCommand::List { page, limit } => {
            let params = ListParams {
                page,
                limit,
                ..ListParams::default()
            };
            let list = util::resolve(portfolio.certificates(&params).await, global.quiet)?;
            let out = output::render_list(
                &global.output,
                &list.items,
                |c| CertificateRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            output::pagination_footer(&global.output, list.pagination.as_ref(), global.quiet);
            Ok(())
        }

        CertificatesCommand::Get { id } => {
            let id = util::require_id(&id)?;
            let cert = util::resolve(portfolio.certificate(id).await, global.quiet)
                .map_err(|e| e.not_found_as("certificate", id, "certificates list"))?;
            let out = output::render_single(&global.output, &*cert, detail, |c| c.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertificatesCommand::Create(input) => {
            let form = build_form(CertificateForm::default(), &input)?;
            let mut image = util::image_selection(input.image.as_deref())?;
            config::sign_in(portfolio, cfg).await?;

            let cancel = util::cancel_on_ctrl_c();
            let cert = portfolio
                .submit_certificate(form, None, &mut image, &cancel)
                .await?;
            let out = output::render_single(&global.output, &cert, detail, |c| c.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertificatesCommand::Update { id, input } => {
            let id = util::require_id(&id)?;
            let mut image = util::image_selection(input.image.as_deref())?;
            config::sign_in(portfolio, cfg).await?;

            let existing = util::resolve_live(portfolio.certificate(id).await)
                .map_err(|e| e.not_found_as("certificate", id, "certificates list"))?;
            let form = build_form(CertificateForm::from_certificate(&existing), &input)?;

            let cancel = util::cancel_on_ctrl_c();
            let cert = portfolio
                .submit_certificate(form, Some(id), &mut image, &cancel)
                .await?;
            let out = output::render_single(&global.output, &cert, detail, |c| c.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertificatesCommand::Delete { id } => {
            let id = util::require_id(&id)?;
            if !util::confirm(&format!("Delete certificate {id}?"), global.yes)? {
                return Ok(());
            }
            config::sign_in(portfolio, cfg).await?;
            portfolio.delete_certificate(id, None).await.map_err(|e| {
                CliError::from(e).not_found_as("certificate", id, "certificates list")
            })?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_replace_existing_fields() {
        let base = CertificateForm {
            title: "AWS Solutions Architect".into(),
            issuer: "Amazon".into(),
            date_issued: "2023-05-01".into(),
            ..CertificateForm::default()
        };
        let input = CertificateInputArgs {
            from_file: None,
            title: None,
            issuer: Some("Amazon Web Services".into()),
            date_issued: None,
            credential_id: Some("ABC-123".into()),
            image: None,
        };

        let form = build_form(base, &input).unwrap();
        assert_eq!(form.title, "AWS Solutions Architect");
        assert_eq!(form.issuer, "Amazon Web Services");
        assert_eq!(form.credential_id, "ABC-123");
    }
}
