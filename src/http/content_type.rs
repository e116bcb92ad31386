use strum::{Display, EnumString, IntoStaticStr};

#[derive(EnumString, IntoStaticStr, Debug, PartialEq, Eq, Hash, Clone, Copy, Display)]
pub enum ContentType {
    #[strum(serialize = "application/json")]
    ApplicationJson,
    #[strum(serialize = "application/xml")]
    ApplicationXml,
    #[strum(serialize = "application/octet-stream")]
    ApplicationOctetStream,
    #[strum(serialize = "application/pdf")]
    ApplicationPdf,
    #[strum(serialize = "application/x-www-form-urlencoded")]
    FormUrlEncoded,
    #[strum(serialize = "text/plain")]
    TextPlain,
    #[strum(serialize = "text/html")]
    TextHtml,
    #[strum(serialize = "text/css")]
    TextCss,
    #[strum(serialize = "text/javascript")]
    TextJavascript,
    #[strum(serialize = "image/png")]
    ImagePng,
    #[strum(serialize = "image/jpeg")]
    ImageJpeg,
    #[strum(serialize = "image/svg+xml")]
    ImageSvg,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        self.into()
    }
}
