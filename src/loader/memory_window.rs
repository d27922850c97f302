use std::fmt;

// A range of the DS address space that may hold loaded code. End is exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MemoryWindow {
    name: &'static str,
    start: u32,
    end: u32,
}

impl MemoryWindow {
    pub const fn new(name: &'static str, start: u32, end: u32) -> MemoryWindow {
        assert!(end > start);
        MemoryWindow { name, start, end }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn size(&self) -> u32 {
        self.end - self.start
    }

    pub fn contains(&self, address: u32) -> bool {
        self.start <= address && address < self.end
    }

    // Either bound alone admits the range. This is not a containment test.
    pub fn admits(&self, start: u32, end: u32) -> bool {
        start >= self.start || end <= self.end
    }
}

impl fmt::Display for MemoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X}-0x{:08X})", self.name, self.start, self.end)
    }
}

const NDS_WINDOWS: [MemoryWindow; 5] = [
    MemoryWindow::new("ITCM", 0x01FF_8000, 0x0200_0000),
    MemoryWindow::new("Main RAM", 0x0200_0000, 0x0240_0000),
    MemoryWindow::new("DTCM", 0x027E_0000, 0x027E_4000),
    MemoryWindow::new("Shared WRAM", 0x0300_0000, 0x0300_8000),
    MemoryWindow::new("ARM7 WRAM", 0x0380_0000, 0x0381_0000),
];

// The ordered whitelist of windows that a load target is checked against. The host maps exactly
// these windows, so validation and mapping can't drift apart.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MemoryWindows(Vec<MemoryWindow>);

impl MemoryWindows {
    pub fn new(windows: Vec<MemoryWindow>) -> MemoryWindows {
        MemoryWindows(windows)
    }

    pub fn nds() -> MemoryWindows {
        MemoryWindows(NDS_WINDOWS.to_vec())
    }

    pub fn accepts(&self, start: u32, end: u32) -> bool {
        self.admitting_window(start, end).is_some()
    }

    pub fn admitting_window(&self, start: u32, end: u32) -> Option<&MemoryWindow> {
        self.0.iter().find(|window| window.admits(start, end))
    }

    pub fn window_containing(&self, address: u32) -> Option<&MemoryWindow> {
        self.0.iter().find(|window| window.contains(address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryWindow> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MemoryWindows {
    fn default() -> Self {
        MemoryWindows::nds()
    }
}
