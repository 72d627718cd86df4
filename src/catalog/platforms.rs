//! Static list of supported catalog sections.

/// A catalog section: display name and the listing path on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Menu label.
    pub name: &'static str,
    /// Site-relative path of the listing page.
    pub path: &'static str,
}

const fn platform(name: &'static str, path: &'static str) -> Platform {
    Platform { name, path }
}

/// Supported platforms in menu order. Indices are part of the CLI surface.
pub const PLATFORMS: &[Platform] = &[
    platform("Consoles - Atari 2600", "/Atari_2600_ROMs/List-All-Titles/49"),
    platform("Consoles - Atari 5200", "/Atari_5200_ROMs/48"),
    platform("Consoles - Atari 7800", "/Atari_7800_ROMs/47"),
    platform("Consoles - Atari Jaguar", "/Atari_Jaguar_ROMs/50"),
    platform("Consoles - Bandai Playdia", "/Bandai_Playdia_ISOs/56"),
    platform("Consoles - NeoGeo", "/Neo-Geo_CD_ISOs/List-All-Titles/8"),
    platform("Consoles - Nintendo 64", "/Nintendo_64_ROMs/List-All-Titles/9"),
    platform(
        "Consoles - Nintendo Entertainment system",
        "/Nintendo_Entertainment_System_ROMs/List-All-Titles/13",
    ),
    platform(
        "Consoles - Nintendo Famicom Disk System",
        "/Nintendo_Famicom_Disk_System_ROMs/List-All-Titles/29",
    ),
    platform(
        "Consoles - Nintendo Gamecube",
        "/Nintendo_Gamecube_ISOs/List-All-Titles/42",
    ),
    platform(
        "Consoles - Nintendo Virtual Boy",
        "/Nintendo_Virtual_Boy_ROMs/27",
    ),
    platform("Consoles - Nintendo Wii", "/Nintendo_Wii_ISOs/68"),
    platform(
        "Consoles - Panasonic 3DO",
        "/Panasonic_3DO_(3DO_Interactive_Multiplayer)_ISOs/List-All-Titles/20",
    ),
    platform(
        "Consoles - PC Engine TurboGrafx16",
        "/PC_Engine_-_TurboGrafx16_ROMs/List-All-Titles/16",
    ),
    platform(
        "Consoles - PC Engine CD",
        "/PC_Engine_CD_-_Turbo_Duo_-_TurboGrafx_CD_ISOs/List-All-Titles/18",
    ),
    platform("Consoles - PC-FX", "/PC-FX_ISOs/64"),
    platform(
        "Consoles - Philips CD-i",
        "/Philips_CD-i_ISOs/List-All-Titles/19",
    ),
    platform("Consoles - Sega 32X", "/Sega_32X_ROMs/61"),
    platform("Consoles - Sega CD", "/Sega_CD_ISOs/List-All-Titles/10"),
    platform(
        "Consoles - Sega Dreamcast",
        "/Sega_Dreamcast_ISOs/List-All-Titles/1",
    ),
    platform(
        "Consoles - Sega Genesis/Megadrive",
        "/Sega_Genesis_-_Sega_Megadrive_ROMs/List-All-Titles/6",
    ),
    platform(
        "Consoles - Sega Master System",
        "/Sega_Master_System_ROMs/List-All-Titles/15",
    ),
    platform("Consoles - Sega Saturn", "/Sega_Saturn_ISOs/List-All-Titles/3"),
    platform(
        "Consoles - Sony Playstation",
        "/Sony_Playstation_ISOs/List-All-Titles/2",
    ),
    platform(
        "Consoles - Sony Playstation (Demos)",
        "/Sony_Playstation_-_Demos_ISOs/List-All-Titles/25",
    ),
    platform(
        "Consoles - Sony Playstation 2",
        "/Sony_Playstation_2_ISOs/List-All-Titles/41",
    ),
    platform(
        "Consoles - Super Nintendo",
        "/Super_Nintendo_Entertainment_System_(SNES)_ROMs/List-All-Titles/5",
    ),
    platform("Handheld/Cellphones - Atari Lynx", "/Atari_Lynx_ROMs/28"),
    platform(
        "Handheld/Cellphones - Bandai Wonderswan",
        "/Bandai_Wonderswan_ROMs/List-All-Titles/39",
    ),
    platform(
        "Handheld/Cellphones - Bandai Wonderswan Color",
        "/Bandai_Wonderswan_Color_ROMs/40",
    ),
    platform(
        "Handheld/Cellphones - Neo Geo Pocket/Neo Geo Pocket Color",
        "/Neo_Geo_Pocket_-_Neo_Geo_Pocket_Color_(NGPx)_ROMs/38",
    ),
    platform(
        "Handheld/Cellphones - Nintendo DS",
        "/Nintendo_DS_ROMs/List-All-Titles/32",
    ),
    platform(
        "Handheld/Cellphones - Nintendo Gameboy Advance",
        "/Nintendo_Gameboy_Advance_ROMs/List-All-Titles/31",
    ),
    platform(
        "Handheld/Cellphones - Nintendo Gameboy",
        "/Nintendo_Game_Boy_ROMs/List-All-Titles/12",
    ),
    platform(
        "Handheld/Cellphones - Nintendo Gameboy Color",
        "/Nintendo_Game_Boy_Color_ROMs/List-All-Titles/11",
    ),
    platform(
        "Handheld/Cellphones - Nokia N-Gage",
        "/Nokia_N-Gage_ROMs/List-All-Titles/17",
    ),
    platform(
        "Handheld/Cellphones - Sega Game Gear",
        "/Sega_Game_Gear_ROMs/List-All-Titles/14",
    ),
    platform(
        "Handheld/Cellphones - Sony Playstation Portable",
        "/PSP_ISOs/List-All-Titles/44",
    ),
    platform(
        "Handheld/Cellphones - Sony PSP eBoots (PSX2PSP)",
        "/PSX_on_PSP_ISOs/List-All-Titles/67",
    ),
    platform(
        "Handheld/Cellphones - Sony PocketStation",
        "/Sony_PocketStation_ROMs/List-All-Titles/53",
    ),
];
