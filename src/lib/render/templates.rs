/// Basic HTML shell shared by pages.
pub fn page_shell(lang: &str, head_fragment: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_fragment}
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#
    )
}

/// Page that sends the browser elsewhere straight away.
pub fn redirect_page(target: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="0; url={target}">
<link rel="canonical" href="{target}">
<title>Redirecting</title>
</head>
<body>
<p><a href="{target}">Continue</a></p>
</body>
</html>
"#
    )
}
