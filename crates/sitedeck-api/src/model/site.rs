// ── Site configuration ──
//
// One `SiteConfig` per target site, keyed by `id`. Field names match the
// service's JSON verbatim. Selector strings are opaque here: only the
// automation service interprets them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// How the automation service obtains the subscription URL from a group.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionUrlType {
    /// Read from an input element's value.
    #[default]
    Input,
    /// Obtained through the page's copy action.
    Copy,
}

/// A managed target site.
///
/// `id` doubles as the lookup key and the public subscription-URL path
/// segment, so it never changes once the site has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,
    pub product_url: String,

    pub login_wait_selector: String,
    pub post_login_wait_selector: String,
    pub username_selector: String,
    pub password_selector: String,
    pub login_button_selector: String,
    pub captcha_image_selector: Option<String>,
    pub captcha_input_selector: Option<String>,
    pub captcha_retry_count: u32,

    pub username: String,
    /// Secret. Masked in every list rendering.
    pub password: String,

    pub subscription_label_selector: String,
    pub subscription_group_selector: String,
    pub subscription_url_type: SubscriptionUrlType,
    pub subscription_url_selector: String,
    /// Attribute consulted when extracting the URL. Not cross-checked
    /// against `subscription_url_type`; both combinations are accepted.
    pub subscription_url_attribute: Option<String>,
    /// Regular expression applied by the automation service. Only checked
    /// for being non-empty here, never compiled.
    pub subscription_name_pattern: String,
    pub subscription_url_retry_count: u32,
    pub subscription_url_retry_delay_ms: u64,

    /// Older service builds omit this field; the default matches the
    /// service's own.
    #[serde(default = "default_post_login_delay_ms")]
    pub post_login_delay_ms: u64,
    pub content_validation: String,
}

fn default_post_login_delay_ms() -> u64 {
    100
}

impl SiteConfig {
    /// A new-site draft: no `id`, service defaults for every policy field,
    /// empty strings for everything the operator must fill in.
    pub fn draft() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            product_url: String::new(),
            login_wait_selector: String::new(),
            post_login_wait_selector: String::new(),
            username_selector: String::new(),
            password_selector: String::new(),
            login_button_selector: String::new(),
            captcha_image_selector: None,
            captcha_input_selector: None,
            captcha_retry_count: 2,
            username: String::new(),
            password: String::new(),
            subscription_label_selector: String::new(),
            subscription_group_selector: String::new(),
            subscription_url_type: SubscriptionUrlType::Input,
            subscription_url_selector: String::new(),
            subscription_url_attribute: None,
            subscription_name_pattern: ".*".into(),
            subscription_url_retry_count: 10,
            subscription_url_retry_delay_ms: 100,
            post_login_delay_ms: default_post_login_delay_ms(),
            content_validation: "allow-lan".into(),
        }
    }

    /// Names and values of every required text field, in form order.
    ///
    /// Used by local validation: a required field that is empty blocks
    /// the save.
    pub fn required_text_fields(&self) -> [(&'static str, &str); 15] {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("product_url", &self.product_url),
            ("username", &self.username),
            ("password", &self.password),
            ("login_wait_selector", &self.login_wait_selector),
            ("post_login_wait_selector", &self.post_login_wait_selector),
            ("username_selector", &self.username_selector),
            ("password_selector", &self.password_selector),
            ("login_button_selector", &self.login_button_selector),
            (
                "subscription_label_selector",
                &self.subscription_label_selector,
            ),
            (
                "subscription_group_selector",
                &self.subscription_group_selector,
            ),
            ("subscription_url_selector", &self.subscription_url_selector),
            ("subscription_name_pattern", &self.subscription_name_pattern),
            ("content_validation", &self.content_validation),
        ]
    }
}
