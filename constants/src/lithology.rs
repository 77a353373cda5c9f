/// Rock type palette for lithology colouring of drillhole segments.
pub struct LithologyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub rgb: [u8; 3],
}

pub const LITHOLOGY_MAP: &[LithologyInfo] = &[
    LithologyInfo {
        code: "OVB",
        name: "overburden",
        rgb: [0xc8, 0xb0, 0x8a],
    },
    LithologyInfo {
        code: "BAS",
        name: "basalt",
        rgb: [0x3b, 0x3f, 0x58],
    },
    LithologyInfo {
        code: "AND",
        name: "andesite",
        rgb: [0x7b, 0x6d, 0x8d],
    },
    LithologyInfo {
        code: "GRA",
        name: "granite",
        rgb: [0xe8, 0x9a, 0x9a],
    },
    LithologyInfo {
        code: "DIO",
        name: "diorite",
        rgb: [0x9c, 0xa8, 0x8c],
    },
    LithologyInfo {
        code: "GAB",
        name: "gabbro",
        rgb: [0x2f, 0x5d, 0x50],
    },
    LithologyInfo {
        code: "POR",
        name: "porphyry",
        rgb: [0xd9, 0x6c, 0x3d],
    },
    LithologyInfo {
        code: "BX",
        name: "breccia",
        rgb: [0xa0, 0x52, 0x2d],
    },
    LithologyInfo {
        code: "SST",
        name: "sandstone",
        rgb: [0xe3, 0xc5, 0x65],
    },
    LithologyInfo {
        code: "SLT",
        name: "siltstone",
        rgb: [0xb5, 0xa6, 0x42],
    },
    LithologyInfo {
        code: "SH",
        name: "shale",
        rgb: [0x5e, 0x5a, 0x4a],
    },
    LithologyInfo {
        code: "LST",
        name: "limestone",
        rgb: [0x8e, 0xc9, 0xe0],
    },
    LithologyInfo {
        code: "SCH",
        name: "schist",
        rgb: [0x6a, 0x9f, 0x6a],
    },
    LithologyInfo {
        code: "QTZ",
        name: "quartzite",
        rgb: [0xf4, 0xf1, 0xe6],
    },
];

/// Colour for segments whose lithology is absent or outside the palette.
pub const UNKNOWN_LITHOLOGY_RGB: [u8; 3] = [0x9e, 0x9e, 0x9e];

/// Match a logged lithology against palette codes and names, ignoring case and padding.
pub fn find_lithology(label: &str) -> Option<&'static LithologyInfo> {
    let label = label.trim();
    LITHOLOGY_MAP.iter().find(|info| {
        info.code.eq_ignore_ascii_case(label) || info.name.eq_ignore_ascii_case(label)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_covers_ten_rock_types() {
        assert!(LITHOLOGY_MAP.len() >= 10);
    }

    #[test]
    fn test_lookup_by_code_or_name() {
        assert_eq!(find_lithology("BASALT").map(|i| i.code), Some("BAS"));
        assert_eq!(find_lithology(" bas ").map(|i| i.name), Some("basalt"));
        assert!(find_lithology("kimberlite").is_none());
    }

    #[test]
    fn test_unknown_colour_not_in_palette() {
        assert!(
            LITHOLOGY_MAP
                .iter()
                .all(|info| info.rgb != UNKNOWN_LITHOLOGY_RGB)
        );
    }
}
