//! Australian postcode prefix regions.
//!
//! Each entry maps the first two digits of a postcode to the centre of the
//! metro area or region that prefix covers. Granularity is deliberately
//! coarse: every postcode sharing a prefix collapses onto the same point.

/// A static postcode prefix entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostalRegion {
    /// Two-digit postcode prefix (e.g. `"26"`).
    pub prefix: &'static str,
    /// Region centre latitude.
    pub latitude: f64,
    /// Region centre longitude.
    pub longitude: f64,
    /// Human-readable region name.
    pub place_name: &'static str,
}

const fn region(
    prefix: &'static str,
    latitude: f64,
    longitude: f64,
    place_name: &'static str,
) -> PostalRegion {
    PostalRegion {
        prefix,
        latitude,
        longitude,
        place_name,
    }
}

/// Prefix regions for NSW, ACT, VIC, QLD, SA, WA, TAS and NT.
pub const AUSTRALIAN_REGIONS: &[PostalRegion] = &[
    // NSW 2000-2999 (ACT shares 26xx and 29xx)
    region("20", -33.8688, 151.2093, "Sydney CBD"),
    region("21", -33.8688, 151.2093, "Sydney"),
    region("22", -33.8688, 151.2093, "Sydney"),
    region("23", -33.7488, 151.1873, "Parramatta"),
    region("24", -33.9173, 151.2313, "Kingsford"),
    region("25", -33.7969, 151.2849, "Ryde"),
    region("26", -35.2809, 149.1300, "Canberra"),
    region("27", -31.9523, 115.8613, "Central Coast"),
    region("28", -32.9267, 151.7789, "Newcastle"),
    region("29", -35.2809, 149.1300, "Canberra"),
    // VIC 3000-3999
    region("30", -37.8136, 144.9631, "Melbourne CBD"),
    region("31", -37.8136, 144.9631, "Melbourne"),
    region("32", -37.8136, 144.9631, "Melbourne"),
    region("33", -37.8683, 145.2036, "Outer Melbourne"),
    region("34", -38.1499, 144.3617, "Geelong"),
    region("35", -36.3704, 146.9294, "Shepparton"),
    region("36", -37.5622, 143.8503, "Ballarat"),
    region("37", -38.3834, 142.1958, "Warrnambool"),
    region("38", -37.5622, 143.8503, "Regional VIC"),
    region("39", -37.5622, 143.8503, "Regional VIC"),
    // QLD 4000-4999
    region("40", -27.4705, 153.0260, "Brisbane CBD"),
    region("41", -27.4705, 153.0260, "Brisbane"),
    region("42", -27.4705, 153.0260, "Brisbane"),
    region("43", -28.0167, 153.4000, "Gold Coast"),
    region("44", -19.2590, 146.8169, "Townsville"),
    region("45", -26.6507, 153.0663, "Sunshine Coast"),
    region("46", -23.3431, 150.5145, "Rockhampton"),
    region("47", -16.9186, 145.7781, "Cairns"),
    region("48", -27.5614, 151.9539, "Toowoomba"),
    region("49", -20.7264, 139.4927, "Mount Isa"),
    // SA 5000-5799
    region("50", -34.9285, 138.6007, "Adelaide CBD"),
    region("51", -34.9285, 138.6007, "Adelaide"),
    region("52", -34.9285, 138.6007, "Adelaide"),
    region("53", -34.7348, 138.5233, "Elizabeth"),
    region("54", -35.1206, 138.5107, "Port Adelaide"),
    region("55", -35.4734, 138.5213, "Victor Harbor"),
    region("56", -34.7213, 138.5255, "Murray Bridge"),
    region("57", -32.4935, 137.7835, "Port Augusta"),
    // WA 6000-6797
    region("60", -31.9505, 115.8605, "Perth CBD"),
    region("61", -31.9505, 115.8605, "Perth"),
    region("62", -31.9505, 115.8605, "Perth"),
    region("63", -32.0391, 115.7439, "Fremantle"),
    region("64", -33.3264, 115.6366, "Bunbury"),
    region("65", -34.9601, 117.8828, "Albany"),
    region("66", -28.7775, 114.6120, "Geraldton"),
    region("67", -20.3100, 118.5741, "Broome"),
    // TAS 7000-7799
    region("70", -42.8821, 147.3272, "Hobart"),
    region("71", -41.4332, 147.1441, "Launceston"),
    region("72", -41.1910, 145.5311, "Burnie"),
    region("73", -42.1500, 145.1400, "Queenstown"),
    // NT 0800-0899
    region("08", -12.4634, 130.8456, "Darwin"),
    region("09", -23.6980, 133.8807, "Alice Springs"),
];
