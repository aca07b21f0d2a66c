//! Listing categories and the identifier prefix each one allocates under.
//!
//! Every category owns its own numbering sequence. Prefixes are built from a
//! fixed `RA-` tag, a segment code, a transaction code and a property code, so
//! commercial shops for rent allocate `RA-COMRESH0001`, `RA-COMRESH0002`, ...
//! while commercial shops for sale allocate `RA-COMSESH0001`, ...
//!
//! Categories are addressed externally by kebab-case slugs such as
//! `commercial-rent-shop` or `paying-guest`.

use core::{fmt, str::FromStr};

const TAG: &str = "RA-";

/// The transaction a listing is offered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transaction {
    /// Offered for rent (`RE`).
    Rent,
    /// Offered for sale (`SE`).
    Sell,
    /// Offered on a long-term lease (`LE`).
    Lease,
}

impl Transaction {
    /// Every transaction, in prefix order.
    pub const ALL: [Self; 3] = [Self::Rent, Self::Sell, Self::Lease];

    const fn code(self) -> &'static str {
        match self {
            Self::Rent => "RE",
            Self::Sell => "SE",
            Self::Lease => "LE",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Sell => "sell",
            Self::Lease => "lease",
        }
    }

    fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == s)
    }
}

/// Commercial property subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommercialKind {
    /// Shop (`SH`).
    Shop,
    /// Retail store (`RS`).
    RetailStore,
    /// Showroom (`SR`).
    Showroom,
    /// Office space (`OS`).
    OfficeSpace,
    /// Warehouse (`WH`).
    Warehouse,
    /// Shed (`SD`).
    Shed,
    /// Agricultural land (`AL`).
    AgriculturalLand,
    /// Industrial land (`IL`).
    IndustrialLand,
}

impl CommercialKind {
    /// Every commercial subtype.
    pub const ALL: [Self; 8] = [
        Self::Shop,
        Self::RetailStore,
        Self::Showroom,
        Self::OfficeSpace,
        Self::Warehouse,
        Self::Shed,
        Self::AgriculturalLand,
        Self::IndustrialLand,
    ];

    const fn code(self) -> &'static str {
        match self {
            Self::Shop => "SH",
            Self::RetailStore => "RS",
            Self::Showroom => "SR",
            Self::OfficeSpace => "OS",
            Self::Warehouse => "WH",
            Self::Shed => "SD",
            Self::AgriculturalLand => "AL",
            Self::IndustrialLand => "IL",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::RetailStore => "retail-store",
            Self::Showroom => "showroom",
            Self::OfficeSpace => "office-space",
            Self::Warehouse => "warehouse",
            Self::Shed => "shed",
            Self::AgriculturalLand => "agricultural-land",
            Self::IndustrialLand => "industrial-land",
        }
    }

    fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == s)
    }
}

/// Residential property subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidentialKind {
    /// Apartment (`AP`).
    Apartment,
    /// Independent house (`IH`).
    IndependentHouse,
    /// Villa (`VL`).
    Villa,
    /// Residential plot (`PL`).
    Plot,
}

impl ResidentialKind {
    /// Every residential subtype.
    pub const ALL: [Self; 4] = [
        Self::Apartment,
        Self::IndependentHouse,
        Self::Villa,
        Self::Plot,
    ];

    const fn code(self) -> &'static str {
        match self {
            Self::Apartment => "AP",
            Self::IndependentHouse => "IH",
            Self::Villa => "VL",
            Self::Plot => "PL",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::IndependentHouse => "independent-house",
            Self::Villa => "villa",
            Self::Plot => "plot",
        }
    }

    fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == s)
    }
}

/// A listing category; each one maps to a distinct identifier prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListingCategory {
    /// A commercial property, prefix `RA-COM<transaction><kind>`.
    Commercial {
        /// How the property is offered.
        transaction: Transaction,
        /// The property subtype.
        kind: CommercialKind,
    },
    /// A residential property, prefix `RA-RES<transaction><kind>`.
    Residential {
        /// How the property is offered.
        transaction: Transaction,
        /// The property subtype.
        kind: ResidentialKind,
    },
    /// Paying-guest accommodation, prefix `RA-PG`.
    PayingGuest,
}

impl ListingCategory {
    /// Every known category, commercial first, then residential, then PG.
    pub fn all() -> Vec<Self> {
        let commercial = Transaction::ALL.into_iter().flat_map(|transaction| {
            CommercialKind::ALL
                .into_iter()
                .map(move |kind| Self::Commercial { transaction, kind })
        });
        let residential = Transaction::ALL.into_iter().flat_map(|transaction| {
            ResidentialKind::ALL
                .into_iter()
                .map(move |kind| Self::Residential { transaction, kind })
        });
        commercial
            .chain(residential)
            .chain(core::iter::once(Self::PayingGuest))
            .collect()
    }

    /// The identifier prefix this category allocates under.
    ///
    /// # Example
    ///
    /// ```
    /// use seqid::{CommercialKind, ListingCategory, Transaction};
    ///
    /// let shop_for_rent = ListingCategory::Commercial {
    ///     transaction: Transaction::Rent,
    ///     kind: CommercialKind::Shop,
    /// };
    /// assert_eq!(shop_for_rent.prefix(), "RA-COMRESH");
    /// ```
    pub fn prefix(&self) -> String {
        match self {
            Self::Commercial { transaction, kind } => {
                format!("{TAG}COM{}{}", transaction.code(), kind.code())
            }
            Self::Residential { transaction, kind } => {
                format!("{TAG}RES{}{}", transaction.code(), kind.code())
            }
            Self::PayingGuest => format!("{TAG}PG"),
        }
    }
}

impl fmt::Display for ListingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commercial { transaction, kind } => {
                write!(f, "commercial-{}-{}", transaction.slug(), kind.slug())
            }
            Self::Residential { transaction, kind } => {
                write!(f, "residential-{}-{}", transaction.slug(), kind.slug())
            }
            Self::PayingGuest => f.write_str("paying-guest"),
        }
    }
}

/// Returned when a slug names no known [`ListingCategory`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing category `{slug}`")]
pub struct ParseCategoryError {
    /// The slug that failed to parse.
    pub slug: String,
}

impl FromStr for ListingCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCategoryError { slug: s.to_owned() };

        if s == "paying-guest" {
            return Ok(Self::PayingGuest);
        }

        let (segment, rest) = s.split_once('-').ok_or_else(err)?;
        let (transaction, kind) = rest.split_once('-').ok_or_else(err)?;
        let transaction = Transaction::from_slug(transaction).ok_or_else(err)?;

        match segment {
            "commercial" => CommercialKind::from_slug(kind)
                .map(|kind| Self::Commercial { transaction, kind })
                .ok_or_else(err),
            "residential" => ResidentialKind::from_slug(kind)
                .map(|kind| Self::Residential { transaction, kind })
                .ok_or_else(err),
            _ => Err(err()),
        }
    }
}
