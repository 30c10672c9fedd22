//! Static court reference data: states → districts → court complexes → court names.

/// Result of a reference lookup. `NoData` means the key is unknown to the
/// table, which is not the same as a known key with an empty list; both skip
/// the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    NoData,
    Choices(&'static [&'static str]),
}

impl Lookup {
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            Lookup::NoData => &[],
            Lookup::Choices(items) => items,
        }
    }

    pub fn has_choices(&self) -> bool {
        !self.choices().is_empty()
    }
}

type Table = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceData {
    pub court_types: &'static [&'static str],
    pub states: &'static [&'static str],
    pub case_types: &'static [&'static str],
    districts: Table,
    court_complexes: Table,
    court_names: Table,
}

fn lookup(table: Table, key: &str) -> Lookup {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, items)| Lookup::Choices(items))
        .unwrap_or(Lookup::NoData)
}

impl ReferenceData {
    pub fn districts(&self, state: &str) -> Lookup {
        lookup(self.districts, state)
    }

    pub fn court_complexes(&self, district: &str) -> Lookup {
        lookup(self.court_complexes, district)
    }

    pub fn court_names(&self, court_complex: &str) -> Lookup {
        lookup(self.court_names, court_complex)
    }
}

pub static SELECT_OPTIONS: ReferenceData = ReferenceData {
    court_types: &["High Court", "District / Taluk Court", "Supreme Court"],
    states: &["Andhra Pradesh", "Karnataka", "Kerala", "Tamil Nadu", "Maharashtra"],
    case_types: &["Civil", "Criminal", "Family", "Commercial"],
    districts: &[
        (
            "Andhra Pradesh",
            &[
                "Anantapur", "Chittoor", "East Godavari", "Guntur", "Krishna", "Kurnool",
                "Nellore", "Prakasam", "Srikakulam", "Visakhapatnam", "Vizianagaram",
                "West Godavari", "YSR Kadapa",
            ],
        ),
        (
            "Karnataka",
            &[
                "Bagalkot", "Ballari", "Belagavi", "Bengaluru Rural", "Bengaluru Urban", "Bidar",
                "Chamarajanagar", "Chikballapur", "Chikkamagaluru", "Chitradurga",
                "Dakshina Kannada", "Davanagere", "Dharwad", "Gadag", "Hassan", "Haveri",
                "Kalaburagi", "Kodagu", "Kolar", "Koppal", "Mandya", "Mysuru", "Raichur",
                "Ramanagara", "Shivamogga", "Tumakuru", "Udupi", "Uttara Kannada", "Vijayapura",
                "Yadgir",
            ],
        ),
        (
            "Kerala",
            &[
                "Alappuzha", "Ernakulam", "Idukki", "Kannur", "Kasaragod", "Kollam", "Kottayam",
                "Kozhikode", "Malappuram", "Palakkad", "Pathanamthitta", "Thiruvananthapuram",
                "Thrissur", "Wayanad",
            ],
        ),
        (
            "Tamil Nadu",
            &[
                "Ariyalur", "Chengalpattu", "Chennai", "Coimbatore", "Cuddalore", "Dharmapuri",
                "Dindigul", "Erode", "Kallakurichi", "Kanchipuram", "Kanyakumari", "Karur",
                "Krishnagiri", "Madurai", "Mayiladuthurai", "Nagapattinam", "Namakkal", "Nilgiris",
                "Perambalur", "Pudukkottai", "Ramanathapuram", "Ranipet", "Salem", "Sivaganga",
                "Tenkasi", "Thanjavur", "Theni", "Thoothukudi", "Tiruchirappalli", "Tirunelveli",
                "Tirupattur", "Tiruppur", "Tiruvallur", "Tiruvannamalai", "Tiruvarur", "Vellore",
                "Viluppuram", "Virudhunagar",
            ],
        ),
        (
            "Maharashtra",
            &[
                "Ahmednagar", "Akola", "Amravati", "Aurangabad", "Beed", "Bhandara", "Buldhana",
                "Chandrapur", "Dhule", "Gadchiroli", "Gondia", "Hingoli", "Jalgaon", "Jalna",
                "Kolhapur", "Latur", "Mumbai City", "Mumbai Suburban", "Nagpur", "Nanded",
                "Nandurbar", "Nashik", "Osmanabad", "Palghar", "Parbhani", "Pune", "Raigad",
                "Ratnagiri", "Sangli", "Satara", "Sindhudurg", "Solapur", "Thane", "Wardha",
                "Washim", "Yavatmal",
            ],
        ),
    ],
    court_complexes: &[
        // Karnataka
        (
            "Bengaluru Urban",
            &[
                "City Civil Court Complex",
                "Magistrate Court Complex",
                "Family Court Complex",
                "Sessions Court Complex",
            ],
        ),
        (
            "Mysuru",
            &["District Court Complex", "Magistrate Court Complex", "Family Court Complex"],
        ),
        ("Belagavi", &["District Court Complex", "Civil Court Complex"]),
        ("Dharwad", &["District Court Complex", "Civil Court Complex"]),
        ("Kalaburagi", &["District Court Complex", "Civil Court Complex"]),
        // Tamil Nadu
        (
            "Chennai",
            &["City Civil Court Complex", "Sessions Court Complex", "Family Court Complex"],
        ),
        ("Coimbatore", &["District Court Complex", "Sessions Court Complex"]),
        ("Madurai", &["District Court Complex", "Sessions Court Complex"]),
        // Maharashtra
        (
            "Mumbai City",
            &["City Civil and Sessions Court", "Small Causes Court", "Family Court"],
        ),
        ("Pune", &["District Court Complex", "Sessions Court Complex"]),
        ("Nagpur", &["District Court Complex", "Sessions Court Complex"]),
        // Kerala
        ("Thiruvananthapuram", &["District Court Complex", "Sessions Court Complex"]),
        ("Kochi", &["District Court Complex", "Sessions Court Complex"]),
        // Andhra Pradesh
        ("Visakhapatnam", &["District Court Complex", "Sessions Court Complex"]),
        ("Vijayawada", &["District Court Complex", "Sessions Court Complex"]),
    ],
    court_names: &[
        (
            "City Civil Court Complex",
            &["Principal City Civil Court", "Additional City Civil Court", "Small Causes Court"],
        ),
        (
            "Magistrate Court Complex",
            &[
                "Chief Metropolitan Magistrate",
                "Additional Chief Metropolitan Magistrate",
                "Metropolitan Magistrate",
            ],
        ),
        ("Family Court Complex", &["Principal Family Court", "Additional Family Court"]),
        ("Sessions Court Complex", &["Principal Sessions Court", "Additional Sessions Court"]),
        (
            "District Court Complex",
            &["Principal District Court", "Additional District Court", "Civil Judge Court"],
        ),
        (
            "Civil Court Complex",
            &["Principal Civil Court", "Additional Civil Court", "Munsiff Court"],
        ),
        (
            "City Civil and Sessions Court",
            &[
                "Principal City Civil and Sessions Court",
                "Additional City Civil and Sessions Court",
            ],
        ),
        ("Small Causes Court", &["Court of Small Causes"]),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        assert!(SELECT_OPTIONS.districts("Karnataka").choices().contains(&"Kodagu"));
        assert_eq!(SELECT_OPTIONS.districts("Goa"), Lookup::NoData);
        assert_eq!(SELECT_OPTIONS.court_complexes("Kodagu"), Lookup::NoData);
        assert!(!SELECT_OPTIONS.court_complexes("Kodagu").has_choices());
        assert_eq!(
            SELECT_OPTIONS.court_names("Small Causes Court"),
            Lookup::Choices(&["Court of Small Causes"])
        );
        // "Family Court" is a complex with no court names listed.
        assert!(!SELECT_OPTIONS.court_names("Family Court").has_choices());
    }

    #[test]
    fn test_empty_choices_differ_from_no_data() {
        let empty = Lookup::Choices(&[]);
        assert_ne!(empty, Lookup::NoData);
        assert!(!empty.has_choices());
        assert!(!Lookup::NoData.has_choices());
    }

    #[test]
    fn test_court_types_match_court_level_labels() {
        use crate::models::CourtLevel;
        for label in SELECT_OPTIONS.court_types {
            assert!(CourtLevel::from_label(label).is_some(), "{label}");
        }
    }
}
