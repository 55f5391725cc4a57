//! Enumerations describing a property listing.
//!
//! All of them are stored as lowercase strings in the database and in the
//! JSON API, and they take part in search fingerprints through that form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! listing_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(concat!("unknown ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

listing_enum!(
    /// Kind of real estate being listed.
    PropertyType {
        House => "house",
        Apartment => "apartment",
        Condo => "condo",
        Townhouse => "townhouse",
        Land => "land",
        Commercial => "commercial",
    }
);

listing_enum!(
    /// Whether the property is offered for sale or for rent.
    ListingType {
        Sale => "sale",
        Rent => "rent",
    }
);

listing_enum!(
    /// Lifecycle of a listing.
    ListingStatus {
        Available => "available",
        Pending => "pending",
        Sold => "sold",
        Rented => "rented",
    }
);

impl Default for ListingStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl ListingStatus {
    /// Closed listings no longer accept new favorites.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Sold | Self::Rented)
    }
}
