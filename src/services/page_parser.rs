//! 查询首页解析
//!
//! 从门户首页的标记里提取两样东西：隐藏的安全 Token，
//! 和验证码图片的绝对地址。页面结构随时可能变，找不到就返回 None，
//! 由上层当作一次失败的尝试来重试。

use reqwest::Url;
use scraper::{Html, Selector};

fn selector(raw: &'static str) -> Selector {
    Selector::parse(raw).expect("静态选择器必然合法")
}

/// 提取表单里的安全 Token（`<input name="Token" value="...">`）
pub fn extract_form_token(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let token_sel = selector(r#"input[name="Token"]"#);
    doc.select(&token_sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|v| v.to_string())
}

/// 提取验证码图片的绝对地址
///
/// 优先找 `<img alt="CAPTCHA">`，找不到再退回到任何 src 里
/// （大小写不敏感）含有 "captcha" 的 `<img>`；相对地址基于首页 URL 拼接。
pub fn extract_captcha_url(html: &str, index_url: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);

    let alt_sel = selector(r#"img[alt="CAPTCHA"]"#);
    let img_sel = selector("img");

    let src = doc
        .select(&alt_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .or_else(|| {
            doc.select(&img_sel)
                .filter_map(|img| img.value().attr("src"))
                .find(|src| src.to_lowercase().contains("captcha"))
        })?;

    index_url.join(src).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_PAGE: &str = r#"
        <html><body>
            <form action="resultpage.php" method="post">
                <input type="hidden" name="Token" value="abc123token" />
                <img alt="CAPTCHA" src="captcha/vtu_captcha.png" />
                <input type="text" name="lns" />
            </form>
        </body></html>
    "#;

    fn base_url() -> Url {
        Url::parse("https://results.vtu.ac.in/D25J26Ecbcs/index.php").expect("测试 URL 合法")
    }

    #[test]
    fn test_extract_form_token() {
        assert_eq!(
            extract_form_token(INDEX_PAGE).as_deref(),
            Some("abc123token")
        );
    }

    #[test]
    fn test_extract_form_token_missing() {
        assert_eq!(extract_form_token("<html><body></body></html>"), None);
    }

    #[test]
    fn test_extract_captcha_url_by_alt() {
        let url = extract_captcha_url(INDEX_PAGE, &base_url()).expect("应找到验证码地址");
        assert_eq!(
            url.as_str(),
            "https://results.vtu.ac.in/D25J26Ecbcs/captcha/vtu_captcha.png"
        );
    }

    #[test]
    fn test_extract_captcha_url_falls_back_to_src_match() {
        let html = r#"
            <img src="logo.png" />
            <img src="/gen/CaptchaImage.php?x=1" />
        "#;
        let url = extract_captcha_url(html, &base_url()).expect("应命中 src 回退");
        assert_eq!(
            url.as_str(),
            "https://results.vtu.ac.in/gen/CaptchaImage.php?x=1"
        );
    }

    #[test]
    fn test_extract_captcha_url_missing() {
        assert_eq!(
            extract_captcha_url(r#"<img src="logo.png" />"#, &base_url()),
            None
        );
    }
}
