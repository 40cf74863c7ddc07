use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, Flow, Http, HttpAuthScheme, OAuth2, Password, Scopes, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use super::handlers::{OAuth2PasswordRequest, TokenResponse};
use crate::config::{Demo, Settings};
use crate::error::{ErrorResponse, Result};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API key demo",
        version = "1.0.0",
        description = "Requests carry a static API key in a header"
    ),
    paths(super::handlers::greet_with_api_key),
    components(schemas(ErrorResponse)),
    tags((name = "demo", description = "Greeting endpoint"))
)]
pub struct ApiKeyDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bearer token demo",
        version = "1.0.0",
        description = "Expiry-only JWTs; the signature is not verified on use"
    ),
    paths(
        super::handlers::issue_bearer_token,
        super::handlers::greet_with_bearer,
    ),
    components(schemas(TokenResponse, ErrorResponse)),
    tags(
        (name = "auth", description = "Token issue"),
        (name = "demo", description = "Greeting endpoint")
    )
)]
pub struct BearerDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OAuth2 password flow demo",
        version = "1.0.0",
        description = "Argon2-hashed users and signed JWTs carrying the username as subject"
    ),
    paths(
        super::handlers::issue_oauth2_token,
        super::handlers::greet_with_oauth2,
    ),
    components(schemas(OAuth2PasswordRequest, TokenResponse, ErrorResponse)),
    tags(
        (name = "auth", description = "Token issue"),
        (name = "demo", description = "Greeting endpoint")
    )
)]
pub struct OAuth2Doc;

/// Title, version and description are replaced from settings at build time
#[derive(OpenApi)]
#[openapi(
    info(title = "docs", version = "0.0.0"),
    paths(super::handlers::greet),
    tags((name = "demo", description = "Greeting endpoint"))
)]
pub struct LocalDocsDoc;

/// Registers the security scheme each demo's endpoints refer to
pub struct SecurityAddon<'a> {
    pub demo: Demo,
    pub api_key_header: &'a str,
}

impl Modify for SecurityAddon<'_> {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        match self.demo {
            Demo::ApiKey => components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(self.api_key_header))),
            ),
            Demo::Bearer => components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            ),
            Demo::OAuth2 => components.add_security_scheme(
                "oauth2_password",
                SecurityScheme::OAuth2(OAuth2::new([Flow::Password(Password::new(
                    "token",
                    Scopes::new(),
                ))])),
            ),
            Demo::Docs => {}
        }
    }
}

/// Generate the OpenAPI document served at `/openapi.json`
pub fn build(demo: Demo, settings: &Settings) -> Result<serde_json::Value> {
    let mut doc = match demo {
        Demo::ApiKey => ApiKeyDoc::openapi(),
        Demo::Bearer => BearerDoc::openapi(),
        Demo::OAuth2 => OAuth2Doc::openapi(),
        Demo::Docs => LocalDocsDoc::openapi(),
    };

    SecurityAddon {
        demo,
        api_key_header: &settings.auth.api_key_header,
    }
    .modify(&mut doc);

    if demo == Demo::Docs {
        let docs = &settings.docs;
        doc.info.title = docs.title.clone();
        doc.info.version = docs.version.clone();
        doc.info.description = Some(docs.description.clone());
    }

    let mut value = serde_json::to_value(&doc)?;

    if demo == Demo::Docs {
        if let Some(logo_url) = &settings.docs.logo_url {
            value["info"]["x-logo"] = serde_json::json!({ "url": logo_url });
        }
    }

    tracing::debug!(demo = %demo, "OpenAPI document generated");
    Ok(value)
}
