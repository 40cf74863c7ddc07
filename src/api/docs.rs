//! HTML shells for the Swagger UI and ReDoc viewers.
//!
//! The docs demo points them at files under `/static`; the other demos load
//! the viewers from the public CDN.

use crate::config::{Demo, DocsConfig};

pub const STATIC_MOUNT: &str = "/static";
pub const OPENAPI_URL: &str = "/openapi.json";
pub const OAUTH2_REDIRECT_URL: &str = "/docs/oauth2-redirect";

/// Where the documentation viewers load their assets from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocAssets {
    pub swagger_js: String,
    pub swagger_css: String,
    pub favicon: String,
    pub redoc_js: String,
}

impl DocAssets {
    pub fn local() -> Self {
        Self {
            swagger_js: format!("{}/swagger-ui-bundle.js", STATIC_MOUNT),
            swagger_css: format!("{}/swagger-ui.css", STATIC_MOUNT),
            favicon: format!("{}/favicon-32x32.png", STATIC_MOUNT),
            redoc_js: format!("{}/redoc.standalone.js", STATIC_MOUNT),
        }
    }

    pub fn cdn(config: &DocsConfig) -> Self {
        let swagger = config.swagger_cdn.trim_end_matches('/');
        let redoc = config.redoc_cdn.trim_end_matches('/');
        Self {
            swagger_js: format!("{}/swagger-ui-bundle.js", swagger),
            swagger_css: format!("{}/swagger-ui.css", swagger),
            favicon: format!("{}/favicon-32x32.png", swagger),
            redoc_js: format!("{}/redoc.standalone.js", redoc),
        }
    }

    pub fn for_demo(demo: Demo, config: &DocsConfig) -> Self {
        match demo {
            Demo::Docs => Self::local(),
            _ => Self::cdn(config),
        }
    }
}

const SWAGGER_UI_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<link type="text/css" rel="stylesheet" href="{{css}}">
<link rel="shortcut icon" href="{{favicon}}">
<title>{{title}}</title>
</head>
<body>
<div id="swagger-ui">
</div>
<script src="{{js}}"></script>
<script>
const ui = SwaggerUIBundle({
    url: '{{openapi_url}}',
    "dom_id": "#swagger-ui",
    "layout": "BaseLayout",
    "deepLinking": true,
    "showExtensions": true,
    "showCommonExtensions": true,
    oauth2RedirectUrl: window.location.origin + '{{oauth2_redirect_url}}',
    presets: [
        SwaggerUIBundle.presets.apis,
        SwaggerUIBundle.SwaggerUIStandalonePreset
    ],
})
</script>
</body>
</html>
"##;

const REDOC_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{title}}</title>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="shortcut icon" href="{{favicon}}">
<style>
  body {
    margin: 0;
    padding: 0;
  }
</style>
</head>
<body>
<noscript>
    ReDoc requires Javascript to function. Please enable it to browse the documentation.
</noscript>
<redoc spec-url="{{openapi_url}}"></redoc>
<script src="{{js}}"> </script>
</body>
</html>
"#;

/// Receives the authorization response from the provider and hands it back
/// to the Swagger UI window that opened the popup.
pub const OAUTH2_REDIRECT_HTML: &str = r#"<!doctype html>
<html lang="en-US">
<head>
    <title>Swagger UI: OAuth2 Redirect</title>
</head>
<body>
<script>
    'use strict';
    function run () {
        var oauth2 = window.opener.swaggerUIRedirectOauth2;
        var sentState = oauth2.state;
        var redirectUrl = oauth2.redirectUrl;
        var isValid, qp, arr;

        if (/code|token|error/.test(window.location.hash)) {
            qp = window.location.hash.substring(1).replace('?', '&');
        } else {
            qp = location.search.substring(1);
        }

        arr = qp.split("&");
        arr.forEach(function (v,i,_arr) { _arr[i] = '"' + v.replace('=', '":"') + '"';});
        qp = qp ? JSON.parse('{' + arr.join() + '}',
                function (key, value) {
                    return key === "" ? value : decodeURIComponent(value);
                }
        ) : {};

        isValid = qp.state === sentState;

        if ((
          oauth2.auth.schema.get("flow") === "accessCode" ||
          oauth2.auth.schema.get("flow") === "authorizationCode" ||
          oauth2.auth.schema.get("flow") === "authorization_code"
        ) && !oauth2.auth.code) {
            if (!isValid) {
                oauth2.errCb({
                    authId: oauth2.auth.name,
                    source: "auth",
                    level: "warning",
                    message: "Authorization may be unsafe, passed state was changed in server. The passed state wasn't returned from auth server."
                });
            }

            if (qp.code) {
                delete oauth2.state;
                oauth2.auth.code = qp.code;
                oauth2.callback({auth: oauth2.auth, redirectUrl: redirectUrl});
            } else {
                let oauthErrorMsg;
                if (qp.error) {
                    oauthErrorMsg = "["+qp.error+"]: " +
                        (qp.error_description ? qp.error_description+ ". " : "no accessCode received from the server. ") +
                        (qp.error_uri ? "More info: "+qp.error_uri : "");
                }

                oauth2.errCb({
                    authId: oauth2.auth.name,
                    source: "auth",
                    level: "error",
                    message: oauthErrorMsg || "[Authorization failed]: no accessCode received from the server."
                });
            }
        } else {
            oauth2.callback({auth: oauth2.auth, token: qp, isValid: isValid, redirectUrl: redirectUrl});
        }
        window.close();
    }

    if (document.readyState !== 'loading') {
        run();
    } else {
        document.addEventListener('DOMContentLoaded', function () {
            run();
        });
    }
</script>
</body>
</html>
"#;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn swagger_ui_html(title: &str, assets: &DocAssets) -> String {
    SWAGGER_UI_TEMPLATE
        .replace("{{title}}", &escape_html(&format!("{} - Swagger UI", title)))
        .replace("{{css}}", &assets.swagger_css)
        .replace("{{favicon}}", &assets.favicon)
        .replace("{{js}}", &assets.swagger_js)
        .replace("{{openapi_url}}", OPENAPI_URL)
        .replace("{{oauth2_redirect_url}}", OAUTH2_REDIRECT_URL)
}

pub fn redoc_html(title: &str, assets: &DocAssets) -> String {
    REDOC_TEMPLATE
        .replace("{{title}}", &escape_html(&format!("{} - ReDoc", title)))
        .replace("{{favicon}}", &assets.favicon)
        .replace("{{js}}", &assets.redoc_js)
        .replace("{{openapi_url}}", OPENAPI_URL)
}
