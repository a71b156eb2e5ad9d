use std::sync::Arc;

use crate::application::error::PageError;
use crate::application::repos::{RepoError, WebsiteSettingsRepo};
use crate::domain::content::TemplateArgs;
use crate::domain::frame::{FrameLink, SiteFrame, TopBarField, group_top_bar};

pub const DEFAULT_BRAND: &str = "Website";

/// Builds the site frame (navigation, footer, branding) for each render.
#[derive(Clone)]
pub struct SiteFrameService {
    settings: Arc<dyn WebsiteSettingsRepo>,
    default_brand: String,
}

impl SiteFrameService {
    pub fn new(settings: Arc<dyn WebsiteSettingsRepo>, default_brand: impl Into<String>) -> Self {
        Self {
            settings,
            default_brand: default_brand.into(),
        }
    }

    pub async fn load(&self) -> Result<SiteFrame, RepoError> {
        let settings = self.settings.load_website_settings().await?;
        let top_bar = self.settings.list_top_bar_items(TopBarField::TopBar).await?;
        let footer = self.settings.list_top_bar_items(TopBarField::Footer).await?;

        let brand = settings
            .brand_html
            .filter(|brand| !brand.trim().is_empty())
            .unwrap_or_else(|| self.default_brand.clone());

        Ok(SiteFrame {
            top_bar_items: group_top_bar(top_bar),
            footer_items: footer.into_iter().map(FrameLink::from).collect(),
            brand,
            copyright: settings.copyright,
            favicon: settings.favicon,
        })
    }

    /// Load the frame and merge it over `args`.
    pub async fn merge_into(&self, args: &mut TemplateArgs) -> Result<(), PageError> {
        let frame = self.load().await?;
        args.extend(TemplateArgs::from_fields(&frame)?);
        Ok(())
    }
}
