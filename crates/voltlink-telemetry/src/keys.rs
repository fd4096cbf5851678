/// Canonical telemetry field identifiers, decoupled from firmware naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryKey {
    /// Battery voltage.
    Vbat,
    /// State of charge.
    Soc,
    /// Load current.
    Iload,
    /// Charge current.
    Ichg,
    /// Discharge current.
    Idsg,
    /// Pack temperature.
    Temp,
    /// Firmware status text.
    Stat,
    /// Net current (signed).
    Inet,
    /// Full charge capacity.
    Fcc,
    /// Remaining capacity.
    Rem,
    /// Device uptime counter.
    Ms,
    /// Charging flag.
    Chg,
    /// UI interaction pending flag.
    UiPending,
    /// Seconds left on the device UI timer.
    UiLeftS,
}

impl TelemetryKey {
    /// Every telemetry key, in display order.
    pub const ALL: [TelemetryKey; 14] = [
        TelemetryKey::Vbat,
        TelemetryKey::Soc,
        TelemetryKey::Iload,
        TelemetryKey::Ichg,
        TelemetryKey::Idsg,
        TelemetryKey::Temp,
        TelemetryKey::Stat,
        TelemetryKey::Inet,
        TelemetryKey::Fcc,
        TelemetryKey::Rem,
        TelemetryKey::Ms,
        TelemetryKey::Chg,
        TelemetryKey::UiPending,
        TelemetryKey::UiLeftS,
    ];

    /// Canonical name (also the preferred wire name).
    pub fn name(self) -> &'static str {
        match self {
            TelemetryKey::Vbat => "vbat",
            TelemetryKey::Soc => "soc",
            TelemetryKey::Iload => "iload",
            TelemetryKey::Ichg => "ichg",
            TelemetryKey::Idsg => "idsg",
            TelemetryKey::Temp => "temp",
            TelemetryKey::Stat => "stat",
            TelemetryKey::Inet => "inet",
            TelemetryKey::Fcc => "fcc",
            TelemetryKey::Rem => "rem",
            TelemetryKey::Ms => "ms",
            TelemetryKey::Chg => "chg",
            TelemetryKey::UiPending => "ui_pending",
            TelemetryKey::UiLeftS => "ui_left_s",
        }
    }

    /// Human-readable label for rendering.
    pub fn label(self) -> &'static str {
        match self {
            TelemetryKey::Vbat => "VBAT",
            TelemetryKey::Soc => "SOC",
            TelemetryKey::Iload => "Load",
            TelemetryKey::Ichg => "Chg",
            TelemetryKey::Idsg => "Dsg",
            TelemetryKey::Temp => "Temp",
            TelemetryKey::Stat => "Stat",
            TelemetryKey::Inet => "Inet",
            TelemetryKey::Fcc => "FCC",
            TelemetryKey::Rem => "REM",
            TelemetryKey::Ms => "Millis",
            TelemetryKey::Chg => "Charging",
            TelemetryKey::UiPending => "UI Pending",
            TelemetryKey::UiLeftS => "UI Left (s)",
        }
    }

    /// Acceptable raw field names, in preference order.
    ///
    /// Firmware has renamed fields across versions; the first alias present
    /// in a packet wins.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            TelemetryKey::Vbat => &["vbat", "vbat_v", "vbat_meas_sys_v"],
            TelemetryKey::Soc => &["soc", "soc_pct"],
            TelemetryKey::Iload => &["iload", "iload_a", "load"],
            TelemetryKey::Ichg => &["ichg", "ichg_a", "ibatt_chg_a", "chg_a"],
            TelemetryKey::Idsg => &["idsg", "idsg_a", "ibatt_dsg_a", "dsg_a"],
            TelemetryKey::Temp => &["temp", "temp_c"],
            TelemetryKey::Stat => &["stat"],
            TelemetryKey::Inet => &["inet", "inet_a"],
            TelemetryKey::Fcc => &["fcc", "fcc_mah"],
            TelemetryKey::Rem => &["rem", "rem_mah"],
            TelemetryKey::Ms => &["ms"],
            TelemetryKey::Chg => &["chg", "charging"],
            TelemetryKey::UiPending => &["ui_pending"],
            TelemetryKey::UiLeftS => &["ui_left_s"],
        }
    }
}

/// Canonical device pin identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKey {
    EnCharge,
    EnDcdc,
    EnRelay,
    EnLoadDsg,
    EnBypass,
    ChgDone,
    Charging,
    BtnSleep,
}

impl PinKey {
    /// Every pin key, in display order.
    pub const ALL: [PinKey; 8] = [
        PinKey::EnCharge,
        PinKey::EnDcdc,
        PinKey::EnRelay,
        PinKey::EnLoadDsg,
        PinKey::EnBypass,
        PinKey::ChgDone,
        PinKey::Charging,
        PinKey::BtnSleep,
    ];

    /// Canonical wire name. Pin names have been stable across firmware
    /// versions, so the alias list is the identity.
    pub fn name(self) -> &'static str {
        match self {
            PinKey::EnCharge => "en_charge",
            PinKey::EnDcdc => "en_dcdc",
            PinKey::EnRelay => "en_relay",
            PinKey::EnLoadDsg => "en_load_dsg",
            PinKey::EnBypass => "en_bypass",
            PinKey::ChgDone => "chg_done",
            PinKey::Charging => "charging",
            PinKey::BtnSleep => "btn_sleep",
        }
    }

    /// Human-readable label for rendering.
    pub fn label(self) -> &'static str {
        match self {
            PinKey::EnCharge => "EN_CHARGE",
            PinKey::EnDcdc => "EN_DCDC",
            PinKey::EnRelay => "EN_RELAY",
            PinKey::EnLoadDsg => "EN_LOAD_DSG",
            PinKey::EnBypass => "EN_BYPASS",
            PinKey::ChgDone => "CHG_DONE",
            PinKey::Charging => "CHARGING",
            PinKey::BtnSleep => "BTN_SLEEP",
        }
    }

    /// Acceptable raw field names, in preference order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            PinKey::EnCharge => &["en_charge"],
            PinKey::EnDcdc => &["en_dcdc"],
            PinKey::EnRelay => &["en_relay"],
            PinKey::EnLoadDsg => &["en_load_dsg"],
            PinKey::EnBypass => &["en_bypass"],
            PinKey::ChgDone => &["chg_done"],
            PinKey::Charging => &["charging"],
            PinKey::BtnSleep => &["btn_sleep"],
        }
    }

    /// Parse a canonical pin name, e.g. from a CLI argument.
    pub fn from_name(name: &str) -> Option<Self> {
        PinKey::ALL.into_iter().find(|pin| pin.name() == name)
    }
}
