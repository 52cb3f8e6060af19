//! Image upload handlers.

use folio_config::Config;
use folio_core::{Portfolio, UploadedImage};

use crate::cli::{GlobalOpts, UploadArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(img: &UploadedImage) -> String {
    format!("URL:        {}\nPublic ID:  {}", img.url, img.public_id)
}

pub async fn handle(
    portfolio: &Portfolio,
    args: UploadArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(public_id) = args.delete {
        let public_id = util::require_id(&public_id)?;
        if !util::confirm(&format!("Delete image {public_id}?"), global.yes)? {
            return Ok(());
        }
        config::sign_in(portfolio, cfg).await?;
        portfolio.delete_image(public_id, None).await?;
        output::status("Image deleted", global.quiet);
        return Ok(());
    }

    let Some(path) = args.file else {
        return Err(CliError::Validation {
            field: "file".into(),
            reason: "an image file or --delete is required".into(),
        });
    };
    let image = util::read_image(&path)?;
    config::sign_in(portfolio, cfg).await?;

    let cancel = util::cancel_on_ctrl_c();
    let uploaded = portfolio.upload_image(image, Some(&cancel)).await?;
    let out = output::render_single(&global.output, &uploaded, detail, |i| i.url.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
