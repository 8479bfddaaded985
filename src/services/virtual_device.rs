use crate::error::Result;
use crate::redirector_error;
use crate::events::KeyCode;
use crate::rules::SynthesizeKeystroke;
use parking_lot::Mutex;
use smallvec::SmallVec;
use tracing::{debug, info};

/// Внедрение синтезированных нажатий в поток ввода
pub trait KeystrokeInjector: Send + Sync {
    fn inject(&self, keystroke: &SynthesizeKeystroke) -> Result<()>;
}

const EV_SYN: i32 = 0;
const EV_KEY: i32 = 1;

/// События (код, нажата) одного повтора: модификаторы Control/Shift/Alt,
/// клавиша, затем отпускание в обратном порядке.
pub fn chord_events(keystroke: &SynthesizeKeystroke) -> SmallVec<[(KeyCode, bool); 8]> {
    let modifiers: SmallVec<[KeyCode; 3]> = keystroke.modifier_codes().collect();
    let mut events = SmallVec::new();

    events.extend(modifiers.iter().map(|&code| (code, true)));
    events.push((keystroke.key(), true));
    events.push((keystroke.key(), false));
    events.extend(modifiers.iter().rev().map(|&code| (code, false)));

    events
}

/// Виртуальная клавиатура uinput
pub struct VirtualDevice {
    device: Option<Mutex<uinput::Device>>,
    device_name: String,
    dry_run: bool,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Mutex::new(Self::create_virtual_device(device_name)?))
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                redirector_error!(
                    internal,
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name,
                    e
                )
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    fn send_chord(&self, chord: &[(KeyCode, bool)], repeats: u32) -> Result<()> {
        let Some(device) = &self.device else {
            return Err(redirector_error!(internal, "Виртуальное устройство недоступно"));
        };

        // Все повторы под одной блокировкой, чтобы не перемешались с другой цепочкой
        let mut device = device.lock();
        for &(code, pressed) in chord.iter().cycle().take(chord.len() * repeats as usize) {
            let keycode = code.value() as i32;
            device.write(EV_KEY, keycode, i32::from(pressed)).map_err(|e| {
                redirector_error!(internal, "Не удалось отправить событие клавиши {}: {}", keycode, e)
            })?;
            device
                .write(EV_SYN, 0, 0)
                .map_err(|e| redirector_error!(internal, "Не удалось синхронизировать события: {}", e))?;
        }

        Ok(())
    }
}

impl KeystrokeInjector for VirtualDevice {
    fn inject(&self, keystroke: &SynthesizeKeystroke) -> Result<()> {
        let repeats = keystroke.repeats();

        if self.dry_run {
            info!(
                "[DRY RUN] {}: клавиша {} x{}",
                self.device_name,
                keystroke.key(),
                repeats
            );
            return Ok(());
        }

        let chord = chord_events(keystroke);
        self.send_chord(&chord, repeats)?;
        debug!(
            "Отправлено {} событий для клавиши {}",
            chord.len() * repeats as usize,
            keystroke.key()
        );
        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if !self.dry_run {
            info!("Закрытие виртуального устройства '{}'", self.device_name);
        }
    }
}
