//! Launch form and error page rendering.

use std::collections::BTreeMap;

/// Script driving the self-submitting form: hides the manual submit block,
/// submits immediately, and reveals the block after four seconds for
/// clients that refuse scripted submission.
const SUBMIT_SCRIPT: &str = r#"<script>
(function(){
  var displaySection = document.getElementById("mediawire_display_submit");
  if (displaySection) {
    displaySection.style.display = "none";
    setTimeout(function(){
      displaySection.style.display = "block";
    }, 4000);
  }
  var ltiForm = document.getElementById("mediawire_lti_post");
  if (!ltiForm) {
    return false;
  }
  ltiForm.submit();
})();
</script>"#;

/// Renders the launch page: a form of hidden inputs POSTed to the LTI
/// endpoint as `application/x-www-form-urlencoded`.
///
/// Parameter names and values are attribute-escaped; the endpoint URL too.
#[must_use]
pub fn launch_form(endpoint_url: &str, params: &BTreeMap<String, String>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<html><head></head><body>");
    html.push_str(&format!(
        "<form id=\"mediawire_lti_post\" method=\"POST\" \
         enctype=\"application/x-www-form-urlencoded\" action=\"{}\">\n",
        escape_html(endpoint_url)
    ));
    for (name, value) in params {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\" />",
            escape_html(name),
            escape_html(value)
        ));
    }
    html.push_str("<div id=\"mediawire_display_submit\">");
    html.push_str("<p>Please press the Submit button to continue.</p>");
    html.push_str("<p><input type=\"submit\" value=\"Submit\"></p></div>");
    html.push_str("</form>\n");
    html.push_str(SUBMIT_SCRIPT);
    html.push_str("</body></html>");
    html
}

/// Renders a minimal centered error page carrying `message`.
///
/// Used for every launch refusal; the message is the generic user-facing
/// text, never configuration detail.
#[must_use]
pub fn error_page(message: &str) -> String {
    let mut html = String::with_capacity(512);
    html.push_str(
        "<style type=\"text/css\">\n\
         body {\n\
             margin: 0;\n\
             padding: 0;\n\
             text-align: center;\n\
             font-size: 14px;\n\
             font-weight: 400;\n\
             line-height: 22px;\n\
             font-family: helvetica;\n\
             background: #333;\n\
             color: #fff;\n\
         }\n\
         .mediawire-error-message {\n\
             margin: 0;\n\
             position: absolute;\n\
             top: 50%;\n\
             left: 50%;\n\
             transform: translate(-50%, -50%);\n\
         }\n\
         </style>\n",
    );
    html.push_str(&format!(
        "<div class=\"mediawire-error-message\">{}</div>",
        escape_html(message)
    ));
    html
}

/// Escape HTML special characters for text and attribute positions.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
