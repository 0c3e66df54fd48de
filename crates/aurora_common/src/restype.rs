//! Numeric resource type codes

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! resource_types {
    ($($(#[$meta:meta])* $variant:ident = $code:literal, $ext:literal;)+) => {
        /// Type tag stored next to every resource name in the archive indices
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum ResourceType {
            $($(#[$meta])* $variant,)+

            /// A code without a known meaning, kept so real indices never fail to parse
            Other(u16),
        }

        impl ResourceType {
            /// The on-disk code of the type
            pub fn code(self) -> u16 {
                match self {
                    $(ResourceType::$variant => $code,)+
                    ResourceType::Other(code) => code,
                }
            }

            /// File extension used when the resource is stored as a loose file
            pub fn extension(self) -> &'static str {
                match self {
                    $(ResourceType::$variant => $ext,)+
                    ResourceType::Other(_) => "bin",
                }
            }

            /// Look up a type by its file extension, ignoring case
            pub fn from_extension(extension: &str) -> Option<ResourceType> {
                match extension.to_ascii_lowercase().as_str() {
                    $($ext => Some(ResourceType::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<u16> for ResourceType {
            fn from(code: u16) -> Self {
                match code {
                    $($code => ResourceType::$variant,)+
                    other => ResourceType::Other(other),
                }
            }
        }
    };
}

resource_types! {
    /// Windows bitmap
    Bmp = 1, "bmp";
    /// Targa image
    Tga = 3, "tga";
    /// Wave audio, possibly with an MP3 payload
    Wav = 4, "wav";
    /// Plain text
    Txt = 10, "txt";
    /// Compiled model structure stream
    Mdl = 2002, "mdl";
    /// Script source
    Nss = 2009, "nss";
    /// Compiled script
    Ncs = 2010, "ncs";
    /// Static area properties
    Are = 2012, "are";
    /// Module information
    Ifo = 2014, "ifo";
    /// Walkmesh
    Wok = 2016, "wok";
    /// Tabular lookup data
    TwoDa = 2017, "2da";
    /// Texture information text
    Txi = 2022, "txi";
    /// Dynamic area instances
    Git = 2023, "git";
    /// Item template
    Uti = 2025, "uti";
    /// Creature template
    Utc = 2027, "utc";
    /// Dialogue
    Dlg = 2029, "dlg";
    /// Trigger template
    Utt = 2032, "utt";
    /// Generic structured data
    Gff = 2037, "gff";
    /// Door template
    Utd = 2042, "utd";
    /// Placeable template
    Utp = 2044, "utp";
    /// User interface layout
    Gui = 2047, "gui";
    /// Merchant template
    Utm = 2051, "utm";
    /// Journal
    Jrl = 2056, "jrl";
    /// Waypoint template
    Utw = 2058, "utw";
    /// Area room layout
    Lyt = 3000, "lyt";
    /// Resource image container
    Rim = 3002, "rim";
    /// Texture
    Tpc = 3007, "tpc";
    /// Model vertex data stream
    Mdx = 3008, "mdx";
    /// Encapsulated resource file
    Erf = 9997, "erf";
}

impl ResourceType {
    /// Whether the type is one of the object blueprint (`ut*`) formats
    pub fn is_template(self) -> bool {
        matches!(
            self,
            ResourceType::Uti
                | ResourceType::Utc
                | ResourceType::Utt
                | ResourceType::Utd
                | ResourceType::Utp
                | ResourceType::Utm
                | ResourceType::Utw
        )
    }

    /// Whether the payload of this type is encoded as structured data
    pub fn is_gff(self) -> bool {
        self.is_template()
            || matches!(
                self,
                ResourceType::Are
                    | ResourceType::Ifo
                    | ResourceType::Git
                    | ResourceType::Dlg
                    | ResourceType::Gff
                    | ResourceType::Gui
                    | ResourceType::Jrl
            )
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::ResourceType;

    #[test]
    fn known_codes() {
        assert_eq!(ResourceType::from(2017), ResourceType::TwoDa);
        assert_eq!(ResourceType::from(3007), ResourceType::Tpc);
        assert_eq!(ResourceType::Mdx.code(), 3008);
        assert_eq!(ResourceType::Erf.extension(), "erf");
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let restype = ResourceType::from(4242);
        assert_eq!(restype, ResourceType::Other(4242));
        assert_eq!(restype.code(), 4242);
    }

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(ResourceType::from_extension("UTC"), Some(ResourceType::Utc));
        assert_eq!(ResourceType::from_extension("2da"), Some(ResourceType::TwoDa));
        assert_eq!(ResourceType::from_extension("bin"), None);
    }

    #[test]
    fn templates() {
        assert!(ResourceType::Utp.is_template());
        assert!(!ResourceType::Git.is_template());
        assert!(ResourceType::Git.is_gff());
        assert!(!ResourceType::Mdl.is_gff());
    }
}
